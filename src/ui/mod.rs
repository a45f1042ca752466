//! UI components

mod add_test_dialog;
mod project_page;
mod test_setup_page;
mod wizard_page;
mod wizard_window;

pub use add_test_dialog::AddTestDialog;
pub use project_page::ProjectPageView;
pub use test_setup_page::TestSetupPageView;
pub use wizard_page::{CompleteChangedFn, WizardPage};
pub use wizard_window::{WizardOptions, WizardWindow};
