//! Git locations and their pinned refs.
//!
//! A ref can be written two ways: pip style as a trailing `@ref`, or the
//! way uv records it in receipts as a `rev`, `tag` or `branch` query
//! parameter. [`GitLocation`] reads both into one shape.

/// Query keys uv uses to record a pinned ref.
const REF_KEYS: [&str; 3] = ["rev", "tag", "branch"];

/// A git repository url split into repository, pinned ref and fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitLocation {
    /// Repository url, without ref or fragment. Query parameters other than
    /// the ref keys stay here.
    pub repository: String,
    pub reference: Option<String>,
    /// Everything after `#`, e.g. `subdirectory=cli`.
    pub fragment: Option<String>,
}

impl GitLocation {
    /// Split a url stored without its `git+` prefix.
    pub fn parse(url: &str) -> Self {
        let (rest, fragment) = match url.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment.to_string())),
            None => (url, None),
        };

        let (base, query) = match rest.split_once('?') {
            Some((base, query)) => (base, Some(query)),
            None => (rest, None),
        };

        let mut reference = None;
        let mut kept = Vec::new();
        for pair in query.into_iter().flat_map(|q| q.split('&')) {
            match pair.split_once('=') {
                Some((key, value)) if REF_KEYS.contains(&key) && !value.is_empty() => {
                    reference = Some(value.to_string());
                }
                _ if pair.is_empty() => {}
                _ => kept.push(pair),
            }
        }

        let path_start = path_start(base);
        let (repository, at_ref) = match base[path_start..].rfind('@') {
            Some(at) if at + 1 < base.len() - path_start => {
                let at = path_start + at;
                (&base[..at], Some(base[at + 1..].to_string()))
            }
            _ => (base, None),
        };

        let mut repository = repository.to_string();
        if !kept.is_empty() {
            repository.push('?');
            repository.push_str(&kept.join("&"));
        }

        Self {
            repository,
            reference: at_ref.or(reference),
            fragment,
        }
    }

    /// Render in pip form: `repository[@ref][#fragment]`.
    pub fn to_url(&self) -> String {
        let mut url = self.repository.clone();
        if let Some(reference) = &self.reference {
            url.push('@');
            url.push_str(reference);
        }
        if let Some(fragment) = &self.fragment {
            url.push('#');
            url.push_str(fragment);
        }
        url
    }
}

/// Offset where the url path begins, so an `@` in `user@host` is not taken
/// for a ref.
fn path_start(url: &str) -> usize {
    if let Some(scheme_end) = url.find("://") {
        let authority = scheme_end + 3;
        return url[authority..]
            .find('/')
            .map_or(url.len(), |slash| authority + slash);
    }
    // scp-like `git@host:org/repo`
    url.find(':').map_or(0, |colon| colon + 1)
}
