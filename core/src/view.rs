//! Grid columns and the read-only transforms that feed them.

use chrono::NaiveDate;

use crate::types::{Gender, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Boolean,
    Date,
    Actions,
}

/// One grid column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub field: &'static str,
    pub header: &'static str,
    pub width: u16,
    pub editable: bool,
    pub kind: ColumnKind,
}

pub const COLUMNS: [Column; 6] = [
    Column {
        field: "name",
        header: "Name",
        width: 200,
        editable: true,
        kind: ColumnKind::Text,
    },
    Column {
        field: "address",
        header: "Address",
        width: 200,
        editable: true,
        kind: ColumnKind::Text,
    },
    Column {
        field: "gender",
        header: "Gender (Male)",
        width: 200,
        editable: true,
        kind: ColumnKind::Boolean,
    },
    Column {
        field: "phone",
        header: "Phone",
        width: 150,
        editable: true,
        kind: ColumnKind::Text,
    },
    Column {
        field: "birthday",
        header: "Birthday",
        width: 150,
        editable: true,
        kind: ColumnKind::Date,
    },
    Column {
        field: "actions",
        header: "Actions",
        width: 200,
        editable: false,
        kind: ColumnKind::Actions,
    },
];

/// A record as the grid displays it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow {
    pub id: String,
    pub name: String,
    pub address: String,
    pub is_male: bool,
    pub phone: String,
    /// `None` when the stored birthday does not parse.
    pub birthday: Option<NaiveDate>,
}

impl From<&User> for GridRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            address: user.address.clone(),
            is_male: user.gender.is_male(),
            phone: user.phone.clone(),
            birthday: user.birthday_date(),
        }
    }
}

impl GridRow {
    /// Turn an edited grid row back into a record, starting from the row it
    /// was derived from. An unset date keeps the stored birthday string.
    pub fn apply_to(&self, user: &User) -> User {
        User {
            id: user.id.clone(),
            name: self.name.clone(),
            address: self.address.clone(),
            phone: self.phone.clone(),
            birthday: match self.birthday {
                Some(date) => date.format("%Y-%m-%d").to_string(),
                None => user.birthday.clone(),
            },
            gender: Gender::from_is_male(self.is_male),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: "1".to_string(),
            name: "A".to_string(),
            address: "X".to_string(),
            phone: "0123456789".to_string(),
            birthday: "2000-01-01".to_string(),
            gender: Gender::Male,
        }
    }

    #[test]
    fn columns_match_grid_layout() {
        let headers: Vec<_> = COLUMNS.iter().map(|c| c.header).collect();
        assert_eq!(
            headers,
            ["Name", "Address", "Gender (Male)", "Phone", "Birthday", "Actions"]
        );
        assert!(!COLUMNS[5].editable);
    }

    #[test]
    fn row_derives_display_values() {
        let row = GridRow::from(&user());
        assert!(row.is_male);
        assert_eq!(row.birthday, NaiveDate::from_ymd_opt(2000, 1, 1));

        let mut female = user();
        female.gender = Gender::Female;
        female.birthday = "n/a".to_string();
        let row = GridRow::from(&female);
        assert!(!row.is_male);
        assert_eq!(row.birthday, None);
    }

    #[test]
    fn apply_to_maps_edits_back() {
        let mut row = GridRow::from(&user());
        row.is_male = false;
        row.birthday = NaiveDate::from_ymd_opt(1999, 12, 31);
        row.name = "Edited".to_string();
        let edited = row.apply_to(&user());
        assert_eq!(edited.gender, Gender::Female);
        assert_eq!(edited.birthday, "1999-12-31");
        assert_eq!(edited.name, "Edited");
        assert_eq!(edited.id, "1");
    }
}
