//! Test setup page controller
//!
//! Holds the mutation size and the two test lists of the "Test Setup"
//! wizard page, independent of any widget toolkit. Each user action maps to
//! one method; the GTK page only forwards events and re-renders.

use crate::constants::{FIELD_DIRECTORY, FIELD_MUTATIONS_SIZE, NO_FIXED_SUCCESSOR};
use crate::entry::{EntryRequest, TestEntryFlow};
use crate::error::{FieldError, MutationSizeError, SnapshotError};
use crate::snapshot::TestSetupSnapshot;
use crate::test_list::{TestList, TestRow};
use crate::wizard::{clean_path, FieldRegistry, WizardFields};
use log::{debug, info, warn};
use mcy_create_types::{ListKind, MutationSize, RowId, TestFile};
use std::collections::{BTreeSet, HashMap};
use uuid::Uuid;

/// Callback invoked with the new completeness value
pub type CompleteChangedCallback = Box<dyn Fn(bool) + 'static>;

/// Columns of a reference list row (name, probe check box, percentage).
/// Only the probe column is editable in the list itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceColumn {
    Name,
    Probe,
    Percentage,
}

/// Parse the text of the mutation size field. Empty text is accepted.
pub fn parse_mutation_size(text: &str) -> Result<Option<MutationSize>, MutationSizeError> {
    if text.is_empty() {
        return Ok(None);
    }
    if !text.chars().all(|c| c.is_ascii_digit()) {
        return Err(MutationSizeError::NotANumber(text.to_string()));
    }
    let value: u64 = text
        .parse()
        .map_err(|_| MutationSizeError::TooLarge(text.to_string()))?;
    u32::try_from(value)
        .ok()
        .and_then(MutationSize::new)
        .map(Some)
        .ok_or(MutationSizeError::OutOfRange(value))
}

/// State of the "Test Setup" wizard page
pub struct TestSetupPage {
    /// Raw text of the size field; always empty or a valid size
    mutation_size: String,
    tests: TestList,
    reference_tests: TestList,
    complete_callbacks: HashMap<String, CompleteChangedCallback>,
}

impl TestSetupPage {
    pub fn new() -> Self {
        Self {
            mutation_size: String::new(),
            tests: TestList::new(),
            reference_tests: TestList::new(),
            complete_callbacks: HashMap::new(),
        }
    }

    /// Rebuild a page from a saved setup
    pub fn from_snapshot(snapshot: TestSetupSnapshot) -> Result<Self, SnapshotError> {
        snapshot.validate()?;
        let mut page = Self::new();
        page.mutation_size = snapshot.mutation_size.to_string();
        for file in snapshot.tests {
            page.tests.push(file);
        }
        for file in snapshot.reference_tests {
            page.reference_tests.push(file);
        }
        info!(
            "Restored test setup: size {}, {} tests, {} reference tests",
            page.mutation_size,
            page.tests.len(),
            page.reference_tests.len()
        );
        Ok(page)
    }

    /// Copy of the page contents, available once the page is complete
    pub fn snapshot(&self) -> Option<TestSetupSnapshot> {
        if !self.is_complete() {
            return None;
        }
        Some(TestSetupSnapshot::new(
            self.mutation_size()?,
            self.tests.files(),
            self.reference_tests.files(),
        ))
    }

    pub fn title(&self) -> &'static str {
        "Test Setup"
    }

    // ---- mutation size field ----

    pub fn mutation_size_text(&self) -> &str {
        &self.mutation_size
    }

    pub fn mutation_size(&self) -> Option<MutationSize> {
        parse_mutation_size(&self.mutation_size).ok().flatten()
    }

    /// Validator for the size field. Rejected text leaves the field unchanged.
    pub fn set_mutation_size(&mut self, text: &str) -> Result<(), MutationSizeError> {
        parse_mutation_size(text)?;
        if self.mutation_size != text {
            self.mutation_size = text.to_string();
            self.notify_complete_changed();
        }
        Ok(())
    }

    /// Register the page's fields with the host wizard
    pub fn register_fields(&self, registry: &mut FieldRegistry) {
        registry.register(FIELD_MUTATIONS_SIZE, true);
    }

    /// Push the current field values to the host wizard
    pub fn sync_fields(&self, registry: &mut FieldRegistry) -> Result<(), FieldError> {
        registry.set(FIELD_MUTATIONS_SIZE, self.mutation_size.clone())
    }

    // ---- lists ----

    pub fn list(&self, kind: ListKind) -> &TestList {
        match kind {
            ListKind::Tests => &self.tests,
            ListKind::Reference => &self.reference_tests,
        }
    }

    fn list_mut(&mut self, kind: ListKind) -> &mut TestList {
        match kind {
            ListKind::Tests => &mut self.tests,
            ListKind::Reference => &mut self.reference_tests,
        }
    }

    pub fn tests(&self) -> &TestList {
        &self.tests
    }

    pub fn reference_tests(&self) -> &TestList {
        &self.reference_tests
    }

    /// Find an entry in either list
    pub fn find(&self, id: RowId) -> Option<(ListKind, &TestFile)> {
        [ListKind::Tests, ListKind::Reference]
            .into_iter()
            .find_map(|kind| self.list(kind).get(id).map(|file| (kind, file)))
    }

    /// True iff `name` is already used by an entry of either list
    pub fn is_name_valid(&self, name: &str) -> bool {
        self.tests.contains_name(name) || self.reference_tests.contains_name(name)
    }

    /// Names of every entry except `excluding`
    pub fn taken_names(&self, excluding: Option<RowId>) -> BTreeSet<String> {
        self.tests
            .iter()
            .chain(self.reference_tests.iter())
            .filter(|row| Some(row.id) != excluding)
            .map(|row| row.file.name.clone())
            .collect()
    }

    pub fn select(&mut self, kind: ListKind, id: RowId, selected: bool) {
        self.list_mut(kind).select(id, selected);
    }

    pub fn set_selection(&mut self, kind: ListKind, ids: impl IntoIterator<Item = RowId>) {
        self.list_mut(kind).set_selection(ids);
        debug!("Selection in {}: {:?}", kind, self.list(kind).selected());
    }

    pub fn selected(&self, kind: ListKind) -> Vec<RowId> {
        self.list(kind).selected()
    }

    /// Reorder an entry within its list
    pub fn move_test(&mut self, kind: ListKind, id: RowId, to_index: usize) -> bool {
        self.list_mut(kind).move_to(id, to_index)
    }

    // ---- entry dialog round trips ----

    fn base_dir(host: &dyn WizardFields) -> std::path::PathBuf {
        clean_path(host.field(FIELD_DIRECTORY).unwrap_or_default())
    }

    /// Request for adding a new entry to `kind`
    pub fn add_request(&self, kind: ListKind, host: &dyn WizardFields) -> EntryRequest {
        EntryRequest {
            base_dir: Self::base_dir(host),
            reference: kind.is_reference(),
            existing: None,
            taken_names: self.taken_names(None),
        }
    }

    /// Request for editing entry `id`, pre-populated with its current data
    pub fn edit_request(&self, id: RowId, host: &dyn WizardFields) -> Option<EntryRequest> {
        let (_, file) = self.find(id)?;
        Some(EntryRequest {
            base_dir: Self::base_dir(host),
            reference: file.reference,
            existing: Some(file.clone()),
            taken_names: self.taken_names(Some(id)),
        })
    }

    /// Append a record accepted by the entry dialog
    pub fn accept_add(&mut self, kind: ListKind, mut file: TestFile) -> Option<RowId> {
        if self.is_name_valid(&file.name) {
            warn!("Refusing to add '{}': name already in use", file.name);
            return None;
        }
        file.reference = kind.is_reference();
        file.probe = false;
        let name = file.name.clone();
        let id = self.list_mut(kind).push(file);
        info!("Added '{}' to {}", name, kind);
        if kind == ListKind::Tests {
            self.notify_complete_changed();
        }
        Some(id)
    }

    /// Replace the payload of entry `id` with a record accepted by the
    /// entry dialog. Position, row id, reference mode and probe flag stay.
    pub fn accept_edit(&mut self, id: RowId, mut file: TestFile) -> bool {
        if self.taken_names(Some(id)).contains(&file.name) {
            warn!("Refusing to rename entry to '{}': name already in use", file.name);
            return false;
        }
        let Some((kind, current)) = self.find(id) else {
            warn!("Edit for unknown row {}", id);
            return false;
        };
        file.reference = current.reference;
        file.probe = current.probe;
        info!("Updated '{}' in {}", file.name, kind);
        if let Some(slot) = self.list_mut(kind).get_mut(id) {
            *slot = file;
        }
        true
    }

    /// Add button of the tests list
    pub fn add_test(
        &mut self,
        host: &dyn WizardFields,
        flow: &mut dyn TestEntryFlow,
    ) -> Option<RowId> {
        let request = self.add_request(ListKind::Tests, host);
        let file = flow.exec(&request)?;
        self.accept_add(ListKind::Tests, file)
    }

    /// Add button of the reference tests list
    pub fn add_ref_test(
        &mut self,
        host: &dyn WizardFields,
        flow: &mut dyn TestEntryFlow,
    ) -> Option<RowId> {
        let request = self.add_request(ListKind::Reference, host);
        let file = flow.exec(&request)?;
        self.accept_add(ListKind::Reference, file)
    }

    /// Double-click on an entry of either list
    pub fn edit_test(
        &mut self,
        id: RowId,
        host: &dyn WizardFields,
        flow: &mut dyn TestEntryFlow,
    ) -> bool {
        let Some(request) = self.edit_request(id, host) else {
            return false;
        };
        match flow.exec(&request) {
            Some(file) => self.accept_edit(id, file),
            None => false,
        }
    }

    /// Delete button of the tests list: removes the selected entries
    pub fn del_test(&mut self) -> Vec<TestRow> {
        let removed = self.tests.remove_selected();
        info!("Removed {} test(s)", removed.len());
        self.notify_complete_changed();
        removed
    }

    /// Delete button of the reference tests list
    pub fn del_ref_test(&mut self) -> Vec<TestRow> {
        let removed = self.reference_tests.remove_selected();
        info!("Removed {} reference test(s)", removed.len());
        removed
    }

    /// A cell of a reference entry changed. Only the probe column carries
    /// state; it updates that entry's probe flag and nothing else.
    pub fn item_changed(&mut self, id: RowId, column: ReferenceColumn, checked: bool) {
        if column != ReferenceColumn::Probe {
            return;
        }
        if let Some(file) = self.reference_tests.get_mut(id) {
            file.probe = checked;
            debug!("Probe of '{}' set to {}", file.name, checked);
        }
    }

    // ---- wizard integration ----

    /// The host wizard may advance once a size is set and a test exists
    pub fn is_complete(&self) -> bool {
        !self.mutation_size.is_empty() && !self.tests.is_empty()
    }

    /// No fixed successor; the host picks the next page in order
    pub fn next_id(&self) -> i32 {
        NO_FIXED_SUCCESSOR
    }

    /// Register a completeness callback. Returns an id for `remove_callback`.
    pub fn on_complete_changed<F>(&mut self, callback: F) -> String
    where
        F: Fn(bool) + 'static,
    {
        let id = Uuid::new_v4().to_string();
        self.complete_callbacks.insert(id.clone(), Box::new(callback));
        id
    }

    pub fn remove_callback(&mut self, callback_id: &str) -> bool {
        self.complete_callbacks.remove(callback_id).is_some()
    }

    pub fn callback_count(&self) -> usize {
        self.complete_callbacks.len()
    }

    fn notify_complete_changed(&self) {
        let complete = self.is_complete();
        for callback in self.complete_callbacks.values() {
            callback(complete);
        }
    }
}

impl Default for TestSetupPage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::path::PathBuf;
    use std::rc::Rc;

    /// Entry flow that replays queued answers and records the requests
    struct ScriptedFlow {
        answers: VecDeque<Option<TestFile>>,
        requests: Vec<EntryRequest>,
    }

    impl ScriptedFlow {
        fn accepting(files: impl IntoIterator<Item = TestFile>) -> Self {
            Self {
                answers: files.into_iter().map(Some).collect(),
                requests: Vec::new(),
            }
        }

        fn cancelling() -> Self {
            Self {
                answers: VecDeque::from([None]),
                requests: Vec::new(),
            }
        }
    }

    impl TestEntryFlow for ScriptedFlow {
        fn exec(&mut self, request: &EntryRequest) -> Option<TestFile> {
            self.requests.push(request.clone());
            self.answers.pop_front().flatten()
        }
    }

    fn host() -> FieldRegistry {
        let mut fields = FieldRegistry::new();
        fields.register(FIELD_DIRECTORY, true);
        fields.set(FIELD_DIRECTORY, "/work/proj/").unwrap();
        fields
    }

    fn page_with_tests(names: &[&str]) -> (TestSetupPage, Vec<RowId>) {
        let mut page = TestSetupPage::new();
        let ids = names
            .iter()
            .map(|n| {
                page.accept_add(ListKind::Tests, TestFile::new(*n, format!("run {}", n)))
                    .unwrap()
            })
            .collect();
        (page, ids)
    }

    fn names(list: &TestList) -> Vec<String> {
        list.names().map(str::to_string).collect()
    }

    #[test]
    fn test_completeness_scenario() {
        let host = host();
        let mut page = TestSetupPage::new();
        page.set_mutation_size("50").unwrap();
        assert!(!page.is_complete());

        let mut flow = ScriptedFlow::accepting([TestFile::new("t1", "make t1")]);
        let id = page.add_test(&host, &mut flow).unwrap();
        assert!(page.is_complete());

        page.select(ListKind::Tests, id, true);
        page.del_test();
        assert!(!page.is_complete());
    }

    #[test]
    fn test_incomplete_without_size() {
        let (mut page, _) = page_with_tests(&["a"]);
        assert!(!page.is_complete());
        page.set_mutation_size("1").unwrap();
        assert!(page.is_complete());
        page.set_mutation_size("").unwrap();
        assert!(!page.is_complete());
    }

    #[test]
    fn test_accepted_adds_count_and_cancel_is_noop() {
        let host = host();
        let mut page = TestSetupPage::new();
        let mut flow = ScriptedFlow::accepting([
            TestFile::new("a", "x"),
            TestFile::new("b", "y"),
            TestFile::new("c", "z"),
        ]);
        for _ in 0..3 {
            page.add_test(&host, &mut flow);
        }
        assert_eq!(page.tests().len(), 3);

        let mut cancel = ScriptedFlow::cancelling();
        assert!(page.add_test(&host, &mut cancel).is_none());
        assert_eq!(names(page.tests()), ["a", "b", "c"]);
    }

    #[test]
    fn test_add_request_uses_clean_directory() {
        let host = host();
        let mut page = TestSetupPage::new();
        page.accept_add(ListKind::Reference, TestFile::reference("eq", "x", 50));
        let mut flow = ScriptedFlow::cancelling();
        page.add_test(&host, &mut flow);

        let request = &flow.requests[0];
        assert_eq!(request.base_dir, PathBuf::from("/work/proj"));
        assert!(!request.reference);
        assert!(request.existing.is_none());
        assert!(request.is_name_taken("eq"));
    }

    #[test]
    fn test_add_ref_test_initializes_probe() {
        let host = host();
        let mut page = TestSetupPage::new();
        let mut returned = TestFile::reference("eq", "make eq", 75);
        returned.probe = true;
        let mut flow = ScriptedFlow::accepting([returned]);

        let id = page.add_ref_test(&host, &mut flow).unwrap();
        assert!(flow.requests[0].reference);
        let file = page.reference_tests().get(id).unwrap();
        assert!(!file.probe);
        assert!(file.reference);
        assert_eq!(file.percentage_label(), "75");
        assert!(page.tests().is_empty());
    }

    #[test]
    fn test_is_name_valid_covers_both_lists() {
        let (mut page, _) = page_with_tests(&["sim"]);
        page.accept_add(ListKind::Reference, TestFile::reference("eq", "x", 50));
        assert!(page.is_name_valid("sim"));
        assert!(page.is_name_valid("eq"));
        assert!(!page.is_name_valid("fresh"));
    }

    #[test]
    fn test_duplicate_add_is_refused() {
        let (mut page, _) = page_with_tests(&["sim"]);
        assert!(page
            .accept_add(ListKind::Reference, TestFile::reference("sim", "x", 50))
            .is_none());
        assert!(page.reference_tests().is_empty());
    }

    #[test]
    fn test_del_test_removes_selected_subset() {
        let (mut page, ids) = page_with_tests(&["a", "b", "c", "d"]);
        page.set_selection(ListKind::Tests, [ids[0], ids[2]]);
        let removed = page.del_test();

        assert_eq!(removed.len(), 2);
        assert_eq!(names(page.tests()), ["b", "d"]);
        assert_eq!(page.tests().get(ids[1]).unwrap().command, "run b");
        assert_eq!(page.tests().get(ids[3]).unwrap().command, "run d");
    }

    #[test]
    fn test_del_ref_test_leaves_tests() {
        let (mut page, _) = page_with_tests(&["a"]);
        let r1 = page
            .accept_add(ListKind::Reference, TestFile::reference("r1", "x", 50))
            .unwrap();
        page.accept_add(ListKind::Reference, TestFile::reference("r2", "y", 60));
        page.select(ListKind::Reference, r1, true);
        page.del_ref_test();

        assert_eq!(names(page.reference_tests()), ["r2"]);
        assert_eq!(page.tests().len(), 1);
    }

    #[test]
    fn test_edit_replaces_in_place() {
        let host = host();
        let (mut page, ids) = page_with_tests(&["a", "b", "c"]);
        let mut flow = ScriptedFlow::accepting([TestFile::new("b2", "new command")]);

        assert!(page.edit_test(ids[1], &host, &mut flow));
        let request = &flow.requests[0];
        assert_eq!(request.existing.as_ref().unwrap().name, "b");
        assert!(!request.is_name_taken("b"));
        assert!(request.is_name_taken("a"));

        assert_eq!(names(page.tests()), ["a", "b2", "c"]);
        assert_eq!(page.tests().position(ids[1]), Some(1));
        assert_eq!(page.tests().get(ids[1]).unwrap().command, "new command");
    }

    #[test]
    fn test_edit_reference_keeps_probe_and_mode() {
        let host = host();
        let mut page = TestSetupPage::new();
        let id = page
            .accept_add(ListKind::Reference, TestFile::reference("eq", "x", 50))
            .unwrap();
        page.item_changed(id, ReferenceColumn::Probe, true);

        let mut flow = ScriptedFlow::accepting([TestFile::new("eq", "y")]);
        assert!(page.edit_test(id, &host, &mut flow));
        assert!(flow.requests[0].reference);

        let file = page.reference_tests().get(id).unwrap();
        assert!(file.reference);
        assert!(file.probe);
        assert_eq!(file.command, "y");
    }

    #[test]
    fn test_cancelled_edit_is_noop() {
        let host = host();
        let (mut page, ids) = page_with_tests(&["a"]);
        let mut flow = ScriptedFlow::cancelling();
        assert!(!page.edit_test(ids[0], &host, &mut flow));
        assert_eq!(page.tests().get(ids[0]).unwrap().command, "run a");
    }

    #[test]
    fn test_edit_to_taken_name_is_refused() {
        let (mut page, ids) = page_with_tests(&["a", "b"]);
        assert!(!page.accept_edit(ids[0], TestFile::new("b", "x")));
        assert_eq!(page.tests().get(ids[0]).unwrap().name, "a");
    }

    #[test]
    fn test_probe_toggle_touches_only_probe() {
        let (mut page, test_ids) = page_with_tests(&["t"]);
        let r1 = page
            .accept_add(ListKind::Reference, TestFile::reference("r1", "x", 40))
            .unwrap();
        let r2 = page
            .accept_add(ListKind::Reference, TestFile::reference("r2", "y", 60))
            .unwrap();
        let before_r1 = page.reference_tests().get(r1).unwrap().clone();
        let before_r2 = page.reference_tests().get(r2).unwrap().clone();
        let before_t = page.tests().get(test_ids[0]).unwrap().clone();

        page.item_changed(r1, ReferenceColumn::Probe, true);

        let after_r1 = page.reference_tests().get(r1).unwrap();
        assert!(after_r1.probe);
        assert_eq!(
            TestFile {
                probe: false,
                ..after_r1.clone()
            },
            before_r1
        );
        assert_eq!(page.reference_tests().get(r2).unwrap(), &before_r2);
        assert_eq!(page.tests().get(test_ids[0]).unwrap(), &before_t);
    }

    #[test]
    fn test_other_columns_do_not_change_state() {
        let mut page = TestSetupPage::new();
        let id = page
            .accept_add(ListKind::Reference, TestFile::reference("r", "x", 40))
            .unwrap();
        page.item_changed(id, ReferenceColumn::Percentage, true);
        page.item_changed(id, ReferenceColumn::Name, true);
        assert!(!page.reference_tests().get(id).unwrap().probe);
    }

    #[test]
    fn test_rejected_size_keeps_previous_value() {
        let mut page = TestSetupPage::new();
        page.set_mutation_size("500").unwrap();
        assert_eq!(
            page.set_mutation_size("5x"),
            Err(MutationSizeError::NotANumber("5x".to_string()))
        );
        assert_eq!(
            page.set_mutation_size("0"),
            Err(MutationSizeError::OutOfRange(0))
        );
        assert_eq!(
            page.set_mutation_size("100001"),
            Err(MutationSizeError::OutOfRange(100_001))
        );
        assert_eq!(
            page.set_mutation_size("99999999999999999999999"),
            Err(MutationSizeError::TooLarge(
                "99999999999999999999999".to_string()
            ))
        );
        assert_eq!(page.mutation_size_text(), "500");
        assert_eq!(page.mutation_size().map(MutationSize::get), Some(500));
    }

    #[test]
    fn test_complete_callbacks() {
        let host = host();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut page = TestSetupPage::new();
        let seen_clone = seen.clone();
        let callback_id = page.on_complete_changed(move |complete| {
            seen_clone.borrow_mut().push(complete);
        });

        page.set_mutation_size("10").unwrap();
        let mut flow = ScriptedFlow::accepting([
            TestFile::new("t", "x"),
            TestFile::reference("r", "y", 50),
        ]);
        page.add_test(&host, &mut flow);
        page.add_ref_test(&host, &mut flow);
        page.del_ref_test();
        assert_eq!(*seen.borrow(), [false, true]);

        assert!(page.remove_callback(&callback_id));
        assert_eq!(page.callback_count(), 0);
        page.set_mutation_size("").unwrap();
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_move_test() {
        let (mut page, ids) = page_with_tests(&["a", "b", "c"]);
        assert!(page.move_test(ListKind::Tests, ids[2], 0));
        assert_eq!(names(page.tests()), ["c", "a", "b"]);
        assert!(!page.move_test(ListKind::Reference, ids[0], 0));
    }

    #[test]
    fn test_page_title() {
        assert_eq!(TestSetupPage::new().title(), "Test Setup");
    }

    #[test]
    fn test_next_id_has_no_fixed_successor() {
        assert_eq!(TestSetupPage::new().next_id(), -1);
    }

    #[test]
    fn test_fields_registration() {
        let mut registry = FieldRegistry::new();
        let mut page = TestSetupPage::new();
        page.register_fields(&mut registry);
        assert_eq!(registry.missing_required(), [FIELD_MUTATIONS_SIZE]);

        page.set_mutation_size("42").unwrap();
        page.sync_fields(&mut registry).unwrap();
        assert_eq!(registry.field(FIELD_MUTATIONS_SIZE), Some("42"));
        assert!(registry.missing_required().is_empty());
    }

    #[test]
    fn test_snapshot_round_trip() {
        let (mut page, _) = page_with_tests(&["a", "b"]);
        assert!(page.snapshot().is_none());
        page.set_mutation_size("25").unwrap();
        page.accept_add(ListKind::Reference, TestFile::reference("r", "x", 30));

        let snapshot = page.snapshot().unwrap();
        assert_eq!(snapshot.mutation_size.get(), 25);
        let restored = TestSetupPage::from_snapshot(snapshot).unwrap();
        assert_eq!(names(restored.tests()), ["a", "b"]);
        assert_eq!(names(restored.reference_tests()), ["r"]);
        assert!(restored.is_complete());
    }
}
