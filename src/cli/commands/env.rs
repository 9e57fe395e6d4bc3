//! Shell integration.
//!
//! The `uvfile env` command prints a bash `uv` wrapper. After a successful
//! `uv tool install` or `uv tool upgrade` it runs `uvfile init --force`, and
//! it routes `uv file ...` to `uvfile ...`. Typical use:
//!
//! ```text
//! eval "$(uvfile env)"
//! ```

use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The bash wrapper printed by `uvfile env`.
pub const WRAPPER_SCRIPT: &str = r#"
uv () {
  local exe=("command" "uv")

  if ! type uvfile >/dev/null 2>&1; then
    "${exe[@]}" "$@"
    return
  fi

  local cmd=$1

  case "$cmd" in
    tool)
      local cmd2=$2
      if [[ "$cmd2" =~ ^(install|upgrade)$ ]]; then
        "${exe[@]}" "$@"
        local ret=$?
        if [ $ret -eq 0 ]; then
          uvfile init --force
        fi
        return $ret
      fi
      ;;
    file)
      shift
      uvfile "$@"
      return $?
      ;;
  esac

  "${exe[@]}" "$@"
}

if type -a _uv >/dev/null 2>&1; then
  _uv_completion_wrap() {
    local cword=$COMP_CWORD
    local cur=${COMP_WORDS[cword]}
    local cmd=${COMP_WORDS[1]}

    if [ "$cmd" = "tool" ]; then
      COMPREPLY=($(compgen -W "install upgrade list uninstall" -- "$cur"))
    else
      _uv
    fi
  }
  complete -o bashdefault -o default -F _uv_completion_wrap uv
fi
"#;

/// The env command implementation.
pub struct EnvCommand;

impl Command for EnvCommand {
    fn execute(&self, _ui: &mut dyn UserInterface) -> Result<CommandResult> {
        // Printed regardless of --quiet: the output is meant for eval.
        println!("{}", WRAPPER_SCRIPT);
        Ok(CommandResult::success())
    }
}
