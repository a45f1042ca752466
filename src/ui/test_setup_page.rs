//! Test setup wizard page
//!
//! GTK rendering of [`TestSetupPage`]. Rows carry only their `RowId` (as the
//! widget name); every handler forwards to the controller and re-renders
//! the affected list.

use gtk4::prelude::*;
use gtk4::{
    Box as GtkBox, Button, CheckButton, Entry, InputPurpose, Label, ListBox, ListBoxRow,
    Orientation, ScrolledWindow, SelectionMode, Window,
};
use log::{debug, warn};
use mcy_create_core::{
    FieldRegistry, ListKind, MutationSize, ReferenceColumn, RowId, TestEntryFlow, TestFile,
    TestSetupPage, TestSetupSnapshot,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::add_test_dialog::AddTestDialog;
use super::wizard_page::{CompleteChangedFn, WizardPage};

/// Buttons next to one of the lists
struct ListButtons {
    container: GtkBox,
    add: Button,
    delete: Button,
    up: Button,
    down: Button,
}

impl ListButtons {
    fn new() -> Self {
        let container = GtkBox::new(Orientation::Vertical, 6);
        let add = Button::with_label("Add");
        let delete = Button::with_label("Delete");
        delete.add_css_class("destructive-action");
        let up = Button::from_icon_name("go-up-symbolic");
        up.set_tooltip_text(Some("Move up"));
        let down = Button::from_icon_name("go-down-symbolic");
        down.set_tooltip_text(Some("Move down"));
        container.append(&add);
        container.append(&delete);
        container.append(&up);
        container.append(&down);
        Self {
            container,
            add,
            delete,
            up,
            down,
        }
    }
}

/// The "Test Setup" page of the wizard
#[derive(Clone)]
pub struct TestSetupPageView {
    widget: GtkBox,
    page: Rc<RefCell<TestSetupPage>>,
    fields: Rc<RefCell<FieldRegistry>>,
    test_list: ListBox,
    ref_list: ListBox,
    /// Set while lists or the size entry are rebuilt from the controller
    updating: Rc<Cell<bool>>,
}

impl TestSetupPageView {
    pub fn new(page: TestSetupPage, fields: Rc<RefCell<FieldRegistry>>) -> Self {
        page.register_fields(&mut fields.borrow_mut());
        let initial_size = page.mutation_size_text().to_string();

        let widget = GtkBox::new(Orientation::Vertical, 6);
        widget.set_margin_start(12);
        widget.set_margin_end(12);
        widget.set_margin_top(12);
        widget.set_margin_bottom(12);

        // Mutation size
        let size_label = Label::new(Some("Mutation size:"));
        size_label.set_halign(gtk4::Align::Start);
        widget.append(&size_label);
        let size_entry = Entry::new();
        size_entry.set_input_purpose(InputPurpose::Digits);
        size_entry.set_max_length(MutationSize::MAX.to_string().len() as i32);
        size_entry.set_placeholder_text(Some(&format!(
            "{} - {}",
            MutationSize::MIN,
            MutationSize::MAX
        )));
        size_entry.set_text(&initial_size);
        widget.append(&size_entry);

        // Tests
        let tests_label = Label::new(Some("Tests:"));
        tests_label.set_halign(gtk4::Align::Start);
        tests_label.set_margin_top(6);
        widget.append(&tests_label);
        let test_list = Self::create_list_box();
        let test_buttons = ListButtons::new();
        widget.append(&Self::list_with_buttons(&test_list, &test_buttons));

        // Reference tests
        let ref_label = Label::new(Some("Reference tests:"));
        ref_label.set_halign(gtk4::Align::Start);
        ref_label.set_margin_top(6);
        widget.append(&ref_label);
        widget.append(&Self::reference_header());
        let ref_list = Self::create_list_box();
        let ref_buttons = ListButtons::new();
        widget.append(&Self::list_with_buttons(&ref_list, &ref_buttons));

        let view = Self {
            widget,
            page: Rc::new(RefCell::new(page)),
            fields,
            test_list,
            ref_list,
            updating: Rc::new(Cell::new(false)),
        };

        let view_for_size = view.clone();
        size_entry.connect_changed(move |entry| view_for_size.on_size_changed(entry));

        view.connect_list(ListKind::Tests, &test_buttons);
        view.connect_list(ListKind::Reference, &ref_buttons);

        view.refresh(ListKind::Tests);
        view.refresh(ListKind::Reference);
        view.sync_fields();
        view
    }

    fn create_list_box() -> ListBox {
        let list_box = ListBox::new();
        list_box.set_selection_mode(SelectionMode::Multiple);
        list_box.set_activate_on_single_click(false);
        list_box.add_css_class("boxed-list");
        list_box
    }

    fn list_with_buttons(list_box: &ListBox, buttons: &ListButtons) -> GtkBox {
        let scrolled = ScrolledWindow::new();
        scrolled.set_policy(gtk4::PolicyType::Never, gtk4::PolicyType::Automatic);
        scrolled.set_min_content_height(120);
        scrolled.set_hexpand(true);
        scrolled.set_vexpand(true);
        scrolled.set_child(Some(list_box));

        let hbox = GtkBox::new(Orientation::Horizontal, 6);
        hbox.append(&scrolled);
        hbox.append(&buttons.container);
        hbox
    }

    fn reference_header() -> GtkBox {
        let header = GtkBox::new(Orientation::Horizontal, 8);
        header.set_margin_start(8);
        let name = Label::new(Some("Name"));
        name.set_hexpand(true);
        name.set_halign(gtk4::Align::Start);
        header.append(&name);
        header.append(&Label::new(Some("Probe")));
        let pct = Label::new(Some("%"));
        pct.set_width_chars(4);
        header.append(&pct);
        // Keep the columns above the rows, left of the button column
        header.set_margin_end(96);
        header.add_css_class("dim-label");
        header
    }

    fn connect_list(&self, kind: ListKind, buttons: &ListButtons) {
        let list_box = self.list_box(kind);

        let view = self.clone();
        list_box.connect_selected_rows_changed(move |_| view.sync_selection(kind));

        let view = self.clone();
        list_box.connect_row_activated(move |_, row| {
            if let Ok(id) = row.widget_name().as_str().parse::<RowId>() {
                view.edit(id);
            }
        });

        let view = self.clone();
        buttons.add.connect_clicked(move |_| view.add(kind));

        let view = self.clone();
        buttons.delete.connect_clicked(move |_| view.delete(kind));

        let view = self.clone();
        buttons.up.connect_clicked(move |_| view.move_selected(kind, -1));

        let view = self.clone();
        buttons.down.connect_clicked(move |_| view.move_selected(kind, 1));
    }

    fn list_box(&self, kind: ListKind) -> &ListBox {
        match kind {
            ListKind::Tests => &self.test_list,
            ListKind::Reference => &self.ref_list,
        }
    }

    fn parent_window(&self) -> Option<Window> {
        self.widget.root().and_downcast::<Window>()
    }

    /// Current page contents, once the page is complete
    pub fn snapshot(&self) -> Option<TestSetupSnapshot> {
        self.page.borrow().snapshot()
    }

    pub fn mutation_size(&self) -> Option<MutationSize> {
        self.page.borrow().mutation_size()
    }

    fn sync_fields(&self) {
        let page = self.page.borrow();
        if let Err(e) = page.sync_fields(&mut self.fields.borrow_mut()) {
            warn!("Failed to update wizard fields: {}", e);
        }
    }

    fn on_size_changed(&self, entry: &Entry) {
        if self.updating.get() {
            return;
        }
        let text = entry.text();
        let result = self.page.borrow_mut().set_mutation_size(&text);
        match result {
            Ok(()) => self.sync_fields(),
            Err(e) => {
                debug!("Rejected mutation size input: {}", e);
                let previous = self.page.borrow().mutation_size_text().to_string();
                self.updating.set(true);
                entry.set_text(&previous);
                entry.set_position(-1);
                self.updating.set(false);
            }
        }
    }

    /// Rebuild the rows of one list from the controller
    fn refresh(&self, kind: ListKind) {
        let rows: Vec<(RowId, TestFile, bool)> = {
            let page = self.page.borrow();
            let list = page.list(kind);
            list.iter()
                .map(|row| (row.id, row.file.clone(), list.is_selected(row.id)))
                .collect()
        };

        let list_box = self.list_box(kind);
        self.updating.set(true);
        while let Some(child) = list_box.first_child() {
            list_box.remove(&child);
        }
        for (id, file, selected) in rows {
            let row = self.create_row(kind, id, &file);
            list_box.append(&row);
            if selected {
                list_box.select_row(Some(&row));
            }
        }
        self.updating.set(false);
    }

    fn create_row(&self, kind: ListKind, id: RowId, file: &TestFile) -> ListBoxRow {
        let row = ListBoxRow::new();
        row.set_widget_name(&id.to_string());

        let hbox = GtkBox::new(Orientation::Horizontal, 8);
        hbox.set_margin_start(8);
        hbox.set_margin_end(8);
        hbox.set_margin_top(4);
        hbox.set_margin_bottom(4);

        let name_label = Label::new(Some(&file.name));
        name_label.set_hexpand(true);
        name_label.set_halign(gtk4::Align::Start);
        name_label.set_ellipsize(gtk4::pango::EllipsizeMode::End);
        name_label.set_tooltip_text(Some(&file.command));
        hbox.append(&name_label);

        if kind == ListKind::Reference {
            let probe_check = CheckButton::new();
            probe_check.set_active(file.probe);
            probe_check.set_tooltip_text(Some("Probe"));
            let page = self.page.clone();
            probe_check.connect_toggled(move |check| {
                page.borrow_mut()
                    .item_changed(id, ReferenceColumn::Probe, check.is_active());
            });
            hbox.append(&probe_check);

            let pct_label = Label::new(Some(&file.percentage_label()));
            pct_label.set_width_chars(4);
            hbox.append(&pct_label);
        }

        row.set_child(Some(&hbox));
        row
    }

    fn sync_selection(&self, kind: ListKind) {
        if self.updating.get() {
            return;
        }
        let ids: Vec<RowId> = self
            .list_box(kind)
            .selected_rows()
            .iter()
            .filter_map(|row| row.widget_name().as_str().parse().ok())
            .collect();
        self.page.borrow_mut().set_selection(kind, ids);
    }

    fn add(&self, kind: ListKind) {
        let request = self.page.borrow().add_request(kind, &*self.fields.borrow());
        let mut dialog = AddTestDialog::new(self.parent_window().as_ref());
        let Some(file) = dialog.exec(&request) else {
            debug!("Add to {} cancelled", kind);
            return;
        };
        let added = self.page.borrow_mut().accept_add(kind, file);
        if added.is_some() {
            self.refresh(kind);
        }
    }

    fn delete(&self, kind: ListKind) {
        let removed = match kind {
            ListKind::Tests => self.page.borrow_mut().del_test(),
            ListKind::Reference => self.page.borrow_mut().del_ref_test(),
        };
        if !removed.is_empty() {
            self.refresh(kind);
        }
    }

    fn edit(&self, id: RowId) {
        let request = self.page.borrow().edit_request(id, &*self.fields.borrow());
        let Some(request) = request else {
            warn!("Activated row {} is not in the page", id);
            return;
        };
        let kind = if request.reference {
            ListKind::Reference
        } else {
            ListKind::Tests
        };
        let mut dialog = AddTestDialog::new(self.parent_window().as_ref());
        let Some(file) = dialog.exec(&request) else {
            return;
        };
        let updated = self.page.borrow_mut().accept_edit(id, file);
        if updated {
            self.refresh(kind);
        }
    }

    /// Move the first selected row one step up (`-1`) or down (`1`)
    fn move_selected(&self, kind: ListKind, delta: isize) {
        let target = {
            let page = self.page.borrow();
            let list = page.list(kind);
            list.selected().first().and_then(|&id| {
                let to = list.position(id)?.checked_add_signed(delta)?;
                (to < list.len()).then_some((id, to))
            })
        };
        let Some((id, to)) = target else {
            return;
        };
        if self.page.borrow_mut().move_test(kind, id, to) {
            self.refresh(kind);
        }
    }
}

impl WizardPage for TestSetupPageView {
    fn title(&self) -> &str {
        self.page.borrow().title()
    }

    fn widget(&self) -> &GtkBox {
        &self.widget
    }

    fn is_complete(&self) -> bool {
        self.page.borrow().is_complete()
    }

    fn next_id(&self) -> i32 {
        self.page.borrow().next_id()
    }

    fn set_on_complete_changed(&self, callback: CompleteChangedFn) {
        self.page.borrow_mut().on_complete_changed(callback);
    }
}
