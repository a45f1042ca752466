//! Project directory wizard page

use gtk4::prelude::*;
use gtk4::{gio, Box as GtkBox, Button, Entry, FileDialog, Label, Orientation, Window};
use log::warn;
use mcy_create_core::{FieldRegistry, FIELD_DIRECTORY};
use std::cell::RefCell;
use std::rc::Rc;

use super::wizard_page::{CompleteChangedFn, WizardPage};

/// First page: where the project is created
pub struct ProjectPageView {
    widget: GtkBox,
    fields: Rc<RefCell<FieldRegistry>>,
    on_complete_changed: Rc<RefCell<Option<CompleteChangedFn>>>,
}

impl ProjectPageView {
    pub fn new(fields: Rc<RefCell<FieldRegistry>>, directory: Option<&str>) -> Self {
        fields.borrow_mut().register(FIELD_DIRECTORY, true);

        let widget = GtkBox::new(Orientation::Vertical, 6);
        widget.set_margin_start(12);
        widget.set_margin_end(12);
        widget.set_margin_top(12);
        widget.set_margin_bottom(12);

        let info = Label::new(Some(
            "Choose the directory the mcy project is created in. \
             Test scripts are stored relative to it.",
        ));
        info.set_wrap(true);
        info.set_xalign(0.0);
        widget.append(&info);

        let dir_label = Label::new(Some("Project directory:"));
        dir_label.set_halign(gtk4::Align::Start);
        dir_label.set_margin_top(12);
        widget.append(&dir_label);

        let dir_box = GtkBox::new(Orientation::Horizontal, 6);
        let dir_entry = Entry::new();
        dir_entry.set_hexpand(true);
        dir_box.append(&dir_entry);
        let browse_btn = Button::with_label("Browse...");
        dir_box.append(&browse_btn);
        widget.append(&dir_box);

        let on_complete_changed: Rc<RefCell<Option<CompleteChangedFn>>> =
            Rc::new(RefCell::new(None));

        let fields_clone = fields.clone();
        let callback_clone = on_complete_changed.clone();
        dir_entry.connect_changed(move |entry| {
            let complete = {
                let mut fields = fields_clone.borrow_mut();
                if let Err(e) = fields.set(FIELD_DIRECTORY, entry.text().as_str()) {
                    warn!("Failed to update project directory: {}", e);
                }
                fields.has_required(&[FIELD_DIRECTORY])
            };
            if let Some(callback) = callback_clone.borrow().as_ref() {
                callback(complete);
            }
        });

        let entry_for_browse = dir_entry.clone();
        browse_btn.connect_clicked(move |btn| {
            let file_dialog = FileDialog::builder()
                .title("Select Project Directory")
                .modal(true)
                .build();
            let current = entry_for_browse.text();
            if !current.is_empty() {
                file_dialog.set_initial_folder(Some(&gio::File::for_path(current.as_str())));
            }

            let entry = entry_for_browse.clone();
            let win = btn.root().and_downcast::<Window>();
            file_dialog.select_folder(win.as_ref(), gio::Cancellable::NONE, move |result| {
                if let Ok(folder) = result {
                    if let Some(path) = folder.path() {
                        entry.set_text(&path.to_string_lossy());
                    }
                }
            });
        });

        if let Some(directory) = directory {
            dir_entry.set_text(directory);
        }

        Self {
            widget,
            fields,
            on_complete_changed,
        }
    }
}

impl WizardPage for ProjectPageView {
    fn title(&self) -> &str {
        "Project"
    }

    fn widget(&self) -> &GtkBox {
        &self.widget
    }

    fn is_complete(&self) -> bool {
        self.fields.borrow().has_required(&[FIELD_DIRECTORY])
    }

    fn set_on_complete_changed(&self, callback: CompleteChangedFn) {
        *self.on_complete_changed.borrow_mut() = Some(callback);
    }
}
