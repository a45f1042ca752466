//! Trait for pages hosted by the wizard window
//!
//! Every page exposes its root widget plus the two queries the host needs
//! to drive navigation: completeness and the id of the following page.

use gtk4::Box as GtkBox;
use mcy_create_core::NO_FIXED_SUCCESSOR;

/// Callback invoked with the page's new completeness value
pub type CompleteChangedFn = Box<dyn Fn(bool) + 'static>;

/// A page shown inside the wizard window
pub trait WizardPage {
    /// Title shown above the page
    fn title(&self) -> &str;

    /// Get a reference to the GTK widget container
    fn widget(&self) -> &GtkBox;

    /// Whether the wizard may leave this page forwards
    fn is_complete(&self) -> bool;

    /// Index of the following page, or `NO_FIXED_SUCCESSOR` for the next one in order
    fn next_id(&self) -> i32 {
        NO_FIXED_SUCCESSOR
    }

    /// Set the callback invoked when completeness may have changed.
    /// The callback receives the new value and must not query the page.
    fn set_on_complete_changed(&self, callback: CompleteChangedFn);
}
