//! One rendered ledger row and its inline-edit state machine.
use engine::{Entry, EntryChange, EntryCollection, EntryId, ResultEngine, format_amount, parse_amount};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowField {
    Description,
    Amount,
}

/// `Viewing -> Editing -> Viewing -> Removed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowState {
    Viewing,
    Editing {
        field: RowField,
        snapshot: String,
        buffer: String,
    },
    Removed,
}

/// An edit that left the field with a different text than it started with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowCommit {
    pub id: EntryId,
    pub field: RowField,
    pub value: String,
}

impl RowCommit {
    /// Writes the edit through the collection. The amount is coerced, so
    /// `"10.0"` over `"10"` is accepted here and dropped as unchanged there.
    pub fn apply(self, collection: &mut EntryCollection) -> ResultEngine<Option<EntryChange>> {
        match self.field {
            RowField::Description => collection.set_description(self.id, self.value),
            RowField::Amount => collection.set_amount(self.id, parse_amount(&self.value)),
        }
    }
}

/// Row template output plus the raw values an edit starts from.
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    id: EntryId,
    description: String,
    amount: String,
    human_date: String,
    raw_amount: f64,
    state: RowState,
}

impl RowView {
    pub fn render(entry: &Entry) -> Self {
        Self {
            id: entry.id(),
            description: entry.description().to_string(),
            amount: format_amount(entry.amount()),
            human_date: entry.human_date().to_string(),
            raw_amount: entry.amount(),
            state: RowState::Viewing,
        }
    }

    /// Re-renders the template from the entry, keeping the edit state.
    pub fn refresh(&mut self, entry: &Entry) {
        let state = std::mem::replace(&mut self.state, RowState::Viewing);
        *self = Self::render(entry);
        self.state = state;
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Amount with two decimals.
    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn raw_amount(&self) -> f64 {
        self.raw_amount
    }

    pub fn human_date(&self) -> &str {
        &self.human_date
    }

    pub fn state(&self) -> &RowState {
        &self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, RowState::Editing { .. })
    }

    /// Text being edited, if any.
    pub fn buffer(&self) -> Option<&str> {
        match &self.state {
            RowState::Editing { buffer, .. } => Some(buffer),
            _ => None,
        }
    }

    pub fn editing_field(&self) -> Option<RowField> {
        match &self.state {
            RowState::Editing { field, .. } => Some(*field),
            _ => None,
        }
    }

    /// Starts an inline edit. The amount is edited in its unrounded form.
    pub fn focus(&mut self, field: RowField) {
        if self.state == RowState::Removed {
            return;
        }
        let snapshot = match field {
            RowField::Description => self.description.clone(),
            RowField::Amount => self.raw_amount.to_string(),
        };
        self.state = RowState::Editing {
            field,
            buffer: snapshot.clone(),
            snapshot,
        };
    }

    pub fn push(&mut self, ch: char) {
        if let RowState::Editing { buffer, .. } = &mut self.state {
            buffer.push(ch);
        }
    }

    pub fn pop(&mut self) {
        if let RowState::Editing { buffer, .. } = &mut self.state {
            buffer.pop();
        }
    }

    /// Leaves edit mode. Returns the edit to persist when the text changed.
    pub fn blur(&mut self) -> Option<RowCommit> {
        let RowState::Editing {
            field,
            snapshot,
            buffer,
        } = std::mem::replace(&mut self.state, RowState::Viewing)
        else {
            return None;
        };

        (buffer != snapshot).then(|| RowCommit {
            id: self.id,
            field,
            value: buffer,
        })
    }

    pub fn remove(&mut self) {
        self.state = RowState::Removed;
    }
}
