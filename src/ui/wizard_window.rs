//! Wizard window hosting the pages
//!
//! Pages sit in a `Stack`; a `PageNavigator` decides which one is visible.
//! Button sensitivity follows the completeness value pushed by the current
//! page, so page callbacks never have to query the page back.

use gtk4::prelude::*;
use gtk4::{
    glib, Application, ApplicationWindow, Box as GtkBox, Button, Label, Orientation, Separator,
    Stack, StackTransitionType,
};
use log::{info, warn};
use mcy_create_core::{
    clean_path, FieldRegistry, PageNavigator, TestSetupPage, TestSetupSnapshot, WizardFields,
    FIELD_DIRECTORY,
};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use super::project_page::ProjectPageView;
use super::test_setup_page::TestSetupPageView;
use super::wizard_page::WizardPage;
use crate::config::{save_setup, AppConfig};

/// Start values for a new wizard
#[derive(Debug, Clone, Default)]
pub struct WizardOptions {
    /// Project directory
    pub directory: Option<String>,
    /// Mutation size; ignored when out of range
    pub mutation_size: Option<u32>,
    /// Previously saved setup to resume from
    pub setup: Option<TestSetupSnapshot>,
}

#[derive(Clone)]
struct NavButtons {
    back: Button,
    next: Button,
    finish: Button,
}

impl NavButtons {
    fn update(&self, nav: &PageNavigator, complete: bool) {
        self.back.set_sensitive(nav.current() > 0);
        self.next.set_visible(!nav.is_last());
        self.next.set_sensitive(complete);
        self.finish.set_visible(nav.is_last());
        self.finish.set_sensitive(complete);
    }
}

#[derive(Clone)]
struct WizardState {
    stack: Stack,
    title_label: Label,
    status_label: Label,
    pages: Rc<Vec<Rc<dyn WizardPage>>>,
    nav: Rc<RefCell<PageNavigator>>,
    buttons: NavButtons,
}

impl WizardState {
    fn show_page(&self, index: usize) {
        let Some(page) = self.pages.get(index) else {
            return;
        };
        self.stack.set_visible_child_name(&page_name(index));
        self.title_label.set_text(page.title());
        self.status_label.set_visible(false);
        let complete = page.is_complete();
        self.buttons.update(&self.nav.borrow(), complete);
    }

    fn go_next(&self) {
        let current = self.nav.borrow().current();
        let Some(page) = self.pages.get(current) else {
            return;
        };
        let (next_id, complete) = (page.next_id(), page.is_complete());
        let target = self.nav.borrow_mut().next(next_id, complete);
        if let Some(target) = target {
            self.show_page(target);
        }
    }

    fn go_back(&self) {
        let target = self.nav.borrow_mut().back();
        if let Some(target) = target {
            self.show_page(target);
        }
    }

    fn show_error(&self, message: &str) {
        self.status_label.set_text(message);
        self.status_label.set_visible(true);
    }
}

fn page_name(index: usize) -> String {
    format!("page{}", index)
}

/// Top-level wizard window
pub struct WizardWindow {
    window: ApplicationWindow,
}

impl WizardWindow {
    pub fn new(app: &Application, config: Rc<RefCell<AppConfig>>, options: WizardOptions) -> Self {
        let (width, height) = {
            let cfg = config.borrow();
            (cfg.window.width, cfg.window.height)
        };
        let window = ApplicationWindow::builder()
            .application(app)
            .title("New mcy Project")
            .default_width(width)
            .default_height(height)
            .build();

        let fields = Rc::new(RefCell::new(FieldRegistry::new()));

        let project = Rc::new(ProjectPageView::new(
            fields.clone(),
            options.directory.as_deref(),
        ));

        let mut page = match options.setup {
            Some(snapshot) => match TestSetupPage::from_snapshot(snapshot) {
                Ok(page) => page,
                Err(e) => {
                    warn!("Ignoring saved setup: {}", e);
                    TestSetupPage::new()
                }
            },
            None => TestSetupPage::new(),
        };
        if let Some(size) = options.mutation_size {
            if let Err(e) = page.set_mutation_size(&size.to_string()) {
                warn!("Ignoring mutation size {}: {}", size, e);
            }
        }
        let setup = Rc::new(TestSetupPageView::new(page, fields.clone()));

        let pages: Vec<Rc<dyn WizardPage>> = vec![project, setup.clone()];
        let pages = Rc::new(pages);

        let vbox = GtkBox::new(Orientation::Vertical, 0);

        let title_label = Label::new(None::<&str>);
        title_label.add_css_class("title-2");
        title_label.set_halign(gtk4::Align::Start);
        title_label.set_margin_start(12);
        title_label.set_margin_top(12);
        vbox.append(&title_label);

        let stack = Stack::new();
        stack.set_transition_type(StackTransitionType::SlideLeftRight);
        stack.set_vexpand(true);
        for (i, page) in pages.iter().enumerate() {
            stack.add_named(page.widget(), Some(&page_name(i)));
        }
        vbox.append(&stack);

        let status_label = Label::new(None::<&str>);
        status_label.add_css_class("error");
        status_label.set_wrap(true);
        status_label.set_xalign(0.0);
        status_label.set_margin_start(12);
        status_label.set_margin_end(12);
        status_label.set_visible(false);
        vbox.append(&status_label);

        // Buttons
        vbox.append(&Separator::new(Orientation::Horizontal));
        let button_box = GtkBox::new(Orientation::Horizontal, 8);
        button_box.set_halign(gtk4::Align::End);
        button_box.set_margin_start(12);
        button_box.set_margin_end(12);
        button_box.set_margin_top(8);
        button_box.set_margin_bottom(8);

        let cancel_btn = Button::with_label("Cancel");
        let back_btn = Button::with_label("Back");
        let next_btn = Button::with_label("Next");
        next_btn.add_css_class("suggested-action");
        let finish_btn = Button::with_label("Finish");
        finish_btn.add_css_class("suggested-action");
        button_box.append(&cancel_btn);
        button_box.append(&back_btn);
        button_box.append(&next_btn);
        button_box.append(&finish_btn);
        vbox.append(&button_box);

        window.set_child(Some(&vbox));

        let state = WizardState {
            stack,
            title_label,
            status_label,
            pages: pages.clone(),
            nav: Rc::new(RefCell::new(PageNavigator::new(pages.len()))),
            buttons: NavButtons {
                back: back_btn.clone(),
                next: next_btn.clone(),
                finish: finish_btn.clone(),
            },
        };

        // Completeness pushed by a page only matters while it is shown
        for (i, page) in pages.iter().enumerate() {
            let nav = state.nav.clone();
            let buttons = state.buttons.clone();
            page.set_on_complete_changed(Box::new(move |complete| {
                let nav = nav.borrow();
                if nav.current() == i {
                    buttons.update(&nav, complete);
                }
            }));
        }

        let state_for_next = state.clone();
        next_btn.connect_clicked(move |_| state_for_next.go_next());

        let state_for_back = state.clone();
        back_btn.connect_clicked(move |_| state_for_back.go_back());

        let window_for_cancel = window.clone();
        cancel_btn.connect_clicked(move |_| {
            info!("Wizard cancelled");
            window_for_cancel.close();
        });

        let state_for_finish = state.clone();
        let setup_for_finish = setup.clone();
        let fields_for_finish = fields.clone();
        let window_for_finish = window.clone();
        finish_btn.connect_clicked(move |_| {
            let Some(snapshot) = setup_for_finish.snapshot() else {
                state_for_finish.show_error("The test setup is not complete.");
                return;
            };
            let directory = project_directory(&fields_for_finish.borrow());
            match save_setup(&directory, &snapshot) {
                Ok(path) => {
                    info!("Project setup written to {}", path.display());
                    window_for_finish.close();
                }
                Err(e) => {
                    warn!("Failed to save setup: {:#}", e);
                    state_for_finish.show_error(&format!("Could not save the setup: {:#}", e));
                }
            }
        });

        // Remember window size and wizard values for the next run
        let config_for_close = config.clone();
        let fields_for_close = fields.clone();
        let setup_for_close = setup.clone();
        window.connect_close_request(move |window| {
            let (width, height) = window.default_size();
            let mut cfg = config_for_close.borrow_mut();
            cfg.window.width = width;
            cfg.window.height = height;
            let directory = fields_for_close
                .borrow()
                .field(FIELD_DIRECTORY)
                .map(str::to_string)
                .filter(|d| !d.is_empty());
            if directory.is_some() {
                cfg.wizard.last_directory = directory;
            }
            if let Some(size) = setup_for_close.mutation_size() {
                cfg.wizard.mutation_size = Some(size.get());
            }
            if let Err(e) = cfg.save() {
                warn!("Failed to save config: {}", e);
            }
            glib::Propagation::Proceed
        });

        state.show_page(0);

        Self { window }
    }

    pub fn present(&self) {
        self.window.present();
    }
}

fn project_directory(fields: &FieldRegistry) -> PathBuf {
    clean_path(fields.field(FIELD_DIRECTORY).unwrap_or_default())
}
