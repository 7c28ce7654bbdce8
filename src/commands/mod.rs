pub mod context;
pub mod diff;
pub mod init;
pub mod lint;
pub mod resolve;

pub use context::{CommandContext, LoadRequest, color_choice_to_mode, load_config};
pub use diff::{compute_diff, run_diff, run_diff_impl};
pub use init::{generate_config_template, run_init, run_init_impl};
pub use lint::{format_lint_result, run_lint, run_lint_impl};
pub use resolve::{resolve_configuration, run_resolve, run_resolve_impl};
