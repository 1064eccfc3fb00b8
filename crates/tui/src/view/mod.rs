//! The ledger view: rows, total and the new-entry form, kept in sync with an
//! [`EntryCollection`] through its change notifications.
//!
//! Rendered state lives behind `Rc<RefCell<_>>` so the collection callback
//! can update it. Methods that mutate the collection take what they need
//! from that state first and release the borrow before calling in, since
//! the callback borrows it again synchronously.
mod form;
mod row;

use std::{
    cell::{Ref, RefCell},
    rc::Rc,
};

use engine::{
    CollectionEvent, Entry, EntryChange, EntryCollection, EntryId, ResultEngine, SubscriptionId,
    format_amount,
};

pub use form::{FormField, NewEntryForm};
pub use row::{RowCommit, RowField, RowState, RowView};

/// Where key input goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Form(FormField),
    Rows,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Self::Form(FormField::Description) => Self::Form(FormField::Amount),
            Self::Form(FormField::Amount) => Self::Rows,
            Self::Rows => Self::Form(FormField::Description),
        }
    }
}

/// Everything the collection callback re-renders.
#[derive(Debug, Default)]
pub struct LedgerState {
    pub rows: Vec<RowView>,
    pub total: f64,
    pub selected: usize,
}

impl LedgerState {
    /// The total as the template shows it.
    pub fn total_text(&self) -> String {
        format_amount(self.total)
    }

    pub fn selected_row(&self) -> Option<&RowView> {
        self.rows.get(self.selected)
    }

    fn apply(&mut self, event: &CollectionEvent, collection: &EntryCollection) {
        match event {
            CollectionEvent::Reset => {
                self.rows = collection.iter().map(RowView::render).collect();
            }
            CollectionEvent::Add(id) => {
                if let Some(entry) = collection.get(*id) {
                    self.rows.push(RowView::render(entry));
                }
            }
            CollectionEvent::Change { id, .. } => {
                if let Some(entry) = collection.get(*id)
                    && let Some(row) = self.row_mut(*id)
                {
                    row.refresh(entry);
                }
            }
            CollectionEvent::Remove(id) => {
                if let Some(row) = self.row_mut(*id) {
                    row.remove();
                }
                self.rows.retain(|row| row.state() != &RowState::Removed);
            }
        }

        self.selected = self.selected.min(self.rows.len().saturating_sub(1));
        self.total = collection.total();
        tracing::debug!(?event, rows = self.rows.len(), total = self.total, "ledger re-rendered");
    }

    fn row_mut(&mut self, id: EntryId) -> Option<&mut RowView> {
        self.rows.iter_mut().find(|row| row.id() == id)
    }

    fn editing_row_mut(&mut self) -> Option<&mut RowView> {
        self.rows.iter_mut().find(|row| row.is_editing())
    }
}

#[derive(Debug)]
pub struct LedgerView {
    state: Rc<RefCell<LedgerState>>,
    subscription: SubscriptionId,
    form: NewEntryForm,
    focus: Focus,
}

impl LedgerView {
    /// Subscribes to `collection`. Rows appear once it is loaded.
    pub fn attach(collection: &mut EntryCollection) -> Self {
        let state = Rc::new(RefCell::new(LedgerState {
            total: collection.total(),
            ..LedgerState::default()
        }));

        let sink = Rc::clone(&state);
        let subscription = collection.subscribe(move |event, collection| {
            sink.borrow_mut().apply(event, collection);
        });

        Self {
            state,
            subscription,
            form: NewEntryForm::default(),
            focus: Focus::Form(FormField::Description),
        }
    }

    pub fn detach(self, collection: &mut EntryCollection) {
        collection.unsubscribe(self.subscription);
    }

    pub fn state(&self) -> Ref<'_, LedgerState> {
        self.state.borrow()
    }

    pub fn form(&self) -> &NewEntryForm {
        &self.form
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn is_editing(&self) -> bool {
        self.state.borrow().rows.iter().any(RowView::is_editing)
    }

    /// Whether plain characters are text input rather than commands.
    pub fn is_typing(&self) -> bool {
        matches!(self.focus, Focus::Form(_)) || self.is_editing()
    }

    pub fn select_next(&mut self) {
        let mut state = self.state.borrow_mut();
        if state.selected + 1 < state.rows.len() {
            state.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        let mut state = self.state.borrow_mut();
        state.selected = state.selected.saturating_sub(1);
    }

    pub fn type_char(&mut self, ch: char) {
        match self.focus {
            Focus::Form(field) => self.form.push(field, ch),
            Focus::Rows => {
                if let Some(row) = self.state.borrow_mut().editing_row_mut() {
                    row.push(ch);
                }
            }
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            Focus::Form(field) => self.form.pop(field),
            Focus::Rows => {
                if let Some(row) = self.state.borrow_mut().editing_row_mut() {
                    row.pop();
                }
            }
        }
    }

    /// Moves focus along form description, form amount, rows. Leaving the
    /// rows blurs the row being edited.
    pub fn next_focus(&mut self, collection: &mut EntryCollection) -> ResultEngine<()> {
        self.commit_edit(collection)?;
        self.focus = self.focus.next();
        Ok(())
    }

    /// Starts editing `field` of the selected row.
    pub fn focus_row_field(&mut self, field: RowField) -> bool {
        let mut state = self.state.borrow_mut();
        let selected = state.selected;
        let Some(row) = state.rows.get_mut(selected) else {
            return false;
        };
        row.focus(field);
        self.focus = Focus::Rows;
        true
    }

    /// Ends the current edit. A row whose text changed is written through
    /// the collection, which re-renders it and the total.
    pub fn blur(&mut self, collection: &mut EntryCollection) -> ResultEngine<Option<EntryChange>> {
        if let Focus::Form(_) = self.focus {
            self.focus = Focus::Rows;
            return Ok(None);
        }
        self.commit_edit(collection)
    }

    fn commit_edit(&mut self, collection: &mut EntryCollection) -> ResultEngine<Option<EntryChange>> {
        let commit = self
            .state
            .borrow_mut()
            .editing_row_mut()
            .and_then(RowView::blur);
        match commit {
            Some(commit) => commit.apply(collection),
            None => Ok(None),
        }
    }

    /// Enter: creates an entry from the form, or ends a row edit.
    pub fn submit(&mut self, collection: &mut EntryCollection) -> ResultEngine<Option<EntryId>> {
        match self.focus {
            Focus::Form(_) => {
                let id = collection.create(self.form.take())?;
                self.focus = Focus::Form(FormField::Description);
                Ok(Some(id))
            }
            Focus::Rows => {
                self.commit_edit(collection)?;
                Ok(None)
            }
        }
    }

    pub fn delete_selected(&mut self, collection: &mut EntryCollection) -> ResultEngine<Option<Entry>> {
        let id = self.state.borrow().selected_row().map(RowView::id);
        match id {
            Some(id) => collection.remove(id).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use engine::{EntryDate, MemoryStore, NewEntry, Store};

    use super::*;

    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        writes: Rc<Cell<usize>>,
    }

    impl Store for CountingStore {
        fn load(&mut self) -> ResultEngine<Vec<Entry>> {
            self.inner.load()
        }

        fn insert(&mut self, entry: &Entry) -> ResultEngine<()> {
            self.writes.set(self.writes.get() + 1);
            self.inner.insert(entry)
        }

        fn update(&mut self, entry: &Entry) -> ResultEngine<()> {
            self.writes.set(self.writes.get() + 1);
            self.inner.update(entry)
        }

        fn remove(&mut self, id: EntryId) -> ResultEngine<()> {
            self.writes.set(self.writes.get() + 1);
            self.inner.remove(id)
        }
    }

    fn coffee_ledger() -> (EntryCollection, LedgerView, Rc<Cell<usize>>) {
        let coffee = Entry::new("Coffee", 10.0, EntryDate::now()).unwrap();
        let writes = Rc::new(Cell::new(0));
        let mut collection = EntryCollection::new(CountingStore {
            inner: MemoryStore::seeded(vec![coffee]),
            writes: Rc::clone(&writes),
        });
        let view = LedgerView::attach(&mut collection);
        collection.load().unwrap();
        (collection, view, writes)
    }

    fn type_text(view: &mut LedgerView, text: &str) {
        text.chars().for_each(|ch| view.type_char(ch));
    }

    #[test]
    fn load_renders_rows_then_total() {
        let (_, view, _) = coffee_ledger();
        let state = view.state();
        assert_eq!(state.rows.len(), 1);
        assert_eq!(state.rows[0].amount(), "10.00");
        assert_eq!(state.total_text(), "10.00");
    }

    #[test]
    fn editing_amount_updates_model_and_total() {
        let (mut collection, mut view, writes) = coffee_ledger();
        assert!(view.focus_row_field(RowField::Amount));
        assert_eq!(view.state().rows[0].buffer(), Some("10"));

        view.backspace();
        view.backspace();
        type_text(&mut view, "12.5");
        let change = view.blur(&mut collection).unwrap();

        assert_eq!(change, Some(EntryChange::Amount { previous: 10.0 }));
        let id = view.state().rows[0].id();
        assert_eq!(collection.get(id).unwrap().amount(), 12.5);
        assert_eq!(view.state().rows[0].amount(), "12.50");
        assert_eq!(view.state().total_text(), "12.50");
        assert_eq!(writes.get(), 1);
    }

    #[test]
    fn editing_to_the_same_value_skips_persistence() {
        let (mut collection, mut view, writes) = coffee_ledger();

        view.focus_row_field(RowField::Amount);
        assert_eq!(view.blur(&mut collection).unwrap(), None);

        view.focus_row_field(RowField::Amount);
        type_text(&mut view, ".0");
        assert_eq!(view.blur(&mut collection).unwrap(), None);

        assert_eq!(writes.get(), 0);
        assert!(!view.is_editing());
    }

    #[test]
    fn submit_appends_one_row_and_clears_form() {
        let (mut collection, mut view, _) = coffee_ledger();
        type_text(&mut view, "Tea");
        view.next_focus(&mut collection).unwrap();
        type_text(&mut view, "2.25");

        let id = view.submit(&mut collection).unwrap().unwrap();

        let state = view.state();
        assert_eq!(state.rows.len(), 2);
        assert_eq!(state.rows[1].id(), id);
        assert_eq!(state.rows[1].description(), "Tea");
        assert_eq!(state.total_text(), "12.25");
        assert_eq!(view.form(), &NewEntryForm::default());
        assert_eq!(view.focus(), Focus::Form(FormField::Description));
    }

    #[test]
    fn delete_drops_the_row_and_its_amount() {
        let (mut collection, mut view, _) = coffee_ledger();
        collection.create(NewEntry::new("Tea", 2.0)).unwrap();
        view.select_next();

        let removed = view.delete_selected(&mut collection).unwrap().unwrap();

        assert_eq!(removed.description(), "Tea");
        let state = view.state();
        assert_eq!(state.rows.len(), 1);
        assert_eq!(state.selected, 0);
        assert_eq!(state.total_text(), "10.00");
    }

    #[test]
    fn tab_cycles_focus_and_commits_row_edits() {
        let (mut collection, mut view, _) = coffee_ledger();
        view.focus_row_field(RowField::Description);
        type_text(&mut view, " beans");

        view.next_focus(&mut collection).unwrap();

        assert_eq!(view.focus(), Focus::Form(FormField::Description));
        assert_eq!(view.state().rows[0].description(), "Coffee beans");
        view.next_focus(&mut collection).unwrap();
        assert_eq!(view.focus(), Focus::Form(FormField::Amount));
        view.next_focus(&mut collection).unwrap();
        assert_eq!(view.focus(), Focus::Rows);
        assert!(!view.is_typing());
    }

    #[test]
    fn detached_view_stops_rendering() {
        let (mut collection, view, _) = coffee_ledger();
        let state = Rc::clone(&view.state);
        view.detach(&mut collection);

        collection.create(NewEntry::new("Tea", 2.0)).unwrap();

        assert_eq!(state.borrow().rows.len(), 1);
    }
}
