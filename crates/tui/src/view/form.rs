use engine::{NewEntry, parse_amount};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Description,
    Amount,
}

/// The new-entry form: two free-text fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewEntryForm {
    pub description: String,
    pub amount: String,
}

impl NewEntryForm {
    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Description => &self.description,
            FormField::Amount => &self.amount,
        }
    }

    fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Description => &mut self.description,
            FormField::Amount => &mut self.amount,
        }
    }

    pub fn push(&mut self, field: FormField, ch: char) {
        self.field_mut(field).push(ch);
    }

    pub fn pop(&mut self, field: FormField) {
        self.field_mut(field).pop();
    }

    /// Reads both fields into attributes dated now and clears them.
    pub fn take(&mut self) -> NewEntry {
        let form = std::mem::take(self);
        NewEntry::new(form.description, parse_amount(&form.amount))
    }
}
