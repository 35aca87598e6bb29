pub mod dialogs;
pub mod form_field;
pub mod keybindings;
pub mod objections_view;
mod panels;
pub mod terminal_guard;
pub mod tracker_view;

pub use dialogs::{HelpDialog, ManualCopyDialog};
pub use objections_view::ObjectionsView;
pub use panels::{HeaderBar, StatusBar};
pub use tracker_view::{TrackerFocus, TrackerView};
