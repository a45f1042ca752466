//! Add/edit test dialog
//!
//! Modal window collecting a test's name, command and script, plus the
//! pass-rate threshold in reference mode. `exec` runs a nested main loop, so
//! the caller gets the accepted record (or `None`) synchronously.

use gtk4::prelude::*;
use gtk4::{
    gio, glib, Adjustment, Box as GtkBox, Button, Entry, FileDialog, Label, Orientation,
    Separator, SpinButton, Window,
};
use log::debug;
use mcy_create_core::{finish_entry, validate_entry, EntryRequest, TestEntryFlow, TestFile};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

/// Result state while the dialog is open
#[derive(Clone, Debug)]
enum DialogResult {
    Pending,
    Accepted(TestFile),
    Cancelled,
}

/// Entry flow backed by a GTK modal window
pub struct AddTestDialog {
    parent: Option<Window>,
}

impl AddTestDialog {
    pub fn new(parent: Option<&Window>) -> Self {
        Self {
            parent: parent.cloned(),
        }
    }
}

/// Read the form into a record
struct EntryForm {
    name: Entry,
    command: Entry,
    script: Entry,
    percentage: Option<SpinButton>,
    probe: bool,
}

impl EntryForm {
    fn read(&self) -> TestFile {
        let script = self.script.text().to_string();
        TestFile {
            name: self.name.text().to_string(),
            command: self.command.text().to_string(),
            path: (!script.trim().is_empty()).then(|| PathBuf::from(script.trim())),
            reference: self.percentage.is_some(),
            probe: self.probe,
            percentage: self
                .percentage
                .as_ref()
                .map(|spin| spin.value_as_int().clamp(0, 100) as u8)
                .unwrap_or(100),
        }
    }
}

fn labeled_row(label: &str, child: &impl IsA<gtk4::Widget>) -> GtkBox {
    let row = GtkBox::new(Orientation::Horizontal, 6);
    let label = Label::new(Some(label));
    label.set_width_chars(10);
    label.set_xalign(0.0);
    row.append(&label);
    row.append(child);
    row
}

impl TestEntryFlow for AddTestDialog {
    fn exec(&mut self, request: &EntryRequest) -> Option<TestFile> {
        let request = Rc::new(request.clone());
        let initial = request.initial();

        let title = match (request.is_edit(), request.reference) {
            (false, false) => "Add Test",
            (false, true) => "Add Reference Test",
            (true, false) => "Edit Test",
            (true, true) => "Edit Reference Test",
        };

        let dialog = Window::builder()
            .title(title)
            .modal(true)
            .default_width(460)
            .resizable(false)
            .build();

        if let Some(parent) = &self.parent {
            dialog.set_transient_for(Some(parent));
        }

        let vbox = GtkBox::new(Orientation::Vertical, 12);
        vbox.set_margin_start(12);
        vbox.set_margin_end(12);
        vbox.set_margin_top(12);
        vbox.set_margin_bottom(12);

        let name_entry = Entry::new();
        name_entry.set_text(&initial.name);
        name_entry.set_hexpand(true);
        vbox.append(&labeled_row("Name:", &name_entry));

        let command_entry = Entry::new();
        command_entry.set_text(&initial.command);
        command_entry.set_placeholder_text(Some("bash $PRJDIR/test.sh"));
        command_entry.set_hexpand(true);
        vbox.append(&labeled_row("Command:", &command_entry));

        // Script path with file chooser rooted at the project directory
        let script_box = GtkBox::new(Orientation::Horizontal, 6);
        let script_entry = Entry::new();
        script_entry.set_hexpand(true);
        if let Some(path) = &initial.path {
            script_entry.set_text(&path.to_string_lossy());
        }
        script_box.append(&script_entry);

        let browse_btn = Button::with_label("Browse...");
        let script_for_browse = script_entry.clone();
        let base_dir = request.base_dir.clone();
        browse_btn.connect_clicked(move |btn| {
            let file_dialog = FileDialog::builder()
                .title("Select Test Script")
                .modal(true)
                .build();
            if !base_dir.as_os_str().is_empty() {
                file_dialog.set_initial_folder(Some(&gio::File::for_path(&base_dir)));
            }

            let entry = script_for_browse.clone();
            let win = btn.root().and_downcast::<Window>();
            file_dialog.open(win.as_ref(), gio::Cancellable::NONE, move |result| {
                if let Ok(file) = result {
                    if let Some(path) = file.path() {
                        entry.set_text(&path.to_string_lossy());
                    }
                }
            });
        });
        script_box.append(&browse_btn);
        vbox.append(&labeled_row("Script:", &script_box));

        let percentage_spin = request.reference.then(|| {
            let adj = Adjustment::new(initial.percentage as f64, 0.0, 100.0, 1.0, 10.0, 0.0);
            let spin = SpinButton::new(Some(&adj), 1.0, 0);
            vbox.append(&labeled_row("Pass rate %:", &spin));
            spin
        });

        let error_label = Label::new(None::<&str>);
        error_label.add_css_class("error");
        error_label.set_xalign(0.0);
        error_label.set_wrap(true);
        error_label.set_visible(false);
        vbox.append(&error_label);

        let form = Rc::new(EntryForm {
            name: name_entry.clone(),
            command: command_entry,
            script: script_entry,
            percentage: percentage_spin,
            probe: initial.probe,
        });

        // Buttons
        vbox.append(&Separator::new(Orientation::Horizontal));
        let button_box = GtkBox::new(Orientation::Horizontal, 8);
        button_box.set_halign(gtk4::Align::End);

        let cancel_btn = Button::with_label("Cancel");
        let ok_btn = Button::with_label(if request.is_edit() { "Save" } else { "Add" });
        ok_btn.add_css_class("suggested-action");
        button_box.append(&cancel_btn);
        button_box.append(&ok_btn);
        vbox.append(&button_box);

        dialog.set_child(Some(&vbox));
        dialog.set_default_widget(Some(&ok_btn));
        name_entry.set_activates_default(true);

        let result = Rc::new(RefCell::new(DialogResult::Pending));
        let main_loop = glib::MainLoop::new(None, false);

        // OK: validate, then close with the finished record
        let result_for_ok = result.clone();
        let dialog_for_ok = dialog.clone();
        let request_for_ok = request.clone();
        ok_btn.connect_clicked(move |_| {
            let candidate = form.read();
            match validate_entry(&candidate, &request_for_ok) {
                Ok(()) => {
                    *result_for_ok.borrow_mut() =
                        DialogResult::Accepted(finish_entry(candidate, &request_for_ok));
                    dialog_for_ok.close();
                }
                Err(e) => {
                    debug!("Entry rejected: {}", e);
                    error_label.set_text(&e.to_string());
                    error_label.set_visible(true);
                }
            }
        });

        let result_for_cancel = result.clone();
        let dialog_for_cancel = dialog.clone();
        cancel_btn.connect_clicked(move |_| {
            *result_for_cancel.borrow_mut() = DialogResult::Cancelled;
            dialog_for_cancel.close();
        });

        // Window close (X button or any of the above) ends the nested loop
        let result_for_close = result.clone();
        let loop_for_close = main_loop.clone();
        dialog.connect_close_request(move |_| {
            if matches!(*result_for_close.borrow(), DialogResult::Pending) {
                *result_for_close.borrow_mut() = DialogResult::Cancelled;
            }
            loop_for_close.quit();
            glib::Propagation::Proceed
        });

        dialog.present();
        main_loop.run();

        let outcome = result.replace(DialogResult::Pending);
        match outcome {
            DialogResult::Accepted(file) => Some(file),
            DialogResult::Pending | DialogResult::Cancelled => None,
        }
    }
}
