use crate::data::{admission_date, student::Student};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    #[default]
    Name,
    Email,
    Phone,
    EnrollNumber,
    DateOfAdmission,
}

impl SortColumn {
    pub const ALL: [Self; 5] = [
        Self::Name,
        Self::Email,
        Self::Phone,
        Self::EnrollNumber,
        Self::DateOfAdmission,
    ];

    pub const fn title(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::EnrollNumber => "Enroll Number",
            Self::DateOfAdmission => "Date of Admission",
        }
    }

    pub const fn query_value(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::EnrollNumber => "enroll_number",
            Self::DateOfAdmission => "date_of_admission",
        }
    }

    fn compare(self, a: &Student, b: &Student) -> Ordering {
        let text = |a: &str, b: &str| a.to_lowercase().cmp(&b.to_lowercase());
        match self {
            Self::Name => text(&a.name, &b.name),
            Self::Email => text(&a.email, &b.email),
            Self::Phone => text(&a.phone, &b.phone),
            Self::EnrollNumber => text(&a.enroll_number, &b.enroll_number),
            Self::DateOfAdmission => {
                admission_date::compare(&a.date_of_admission, &b.date_of_admission)
            }
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    pub const fn arrow(self) -> &'static str {
        match self {
            Self::Ascending => "▲",
            Self::Descending => "▼",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortState {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortState {
    /// Clicking the active column flips it, clicking any other starts it ascending.
    #[must_use]
    pub fn clicked(self, column: SortColumn) -> Self {
        if self.column == column {
            Self {
                column,
                direction: self.direction.flipped(),
            }
        } else {
            Self {
                column,
                direction: SortDirection::Ascending,
            }
        }
    }
}

/// Records whose name contains `query`, ignoring case, in their original order.
pub fn filter_by_name<'a>(
    students: impl IntoIterator<Item = &'a Student>,
    query: &str,
) -> Vec<&'a Student> {
    let query = query.to_lowercase();
    students
        .into_iter()
        .filter(|student| student.name.to_lowercase().contains(&query))
        .collect()
}

pub fn sort_rows(rows: &mut [&Student], SortState { column, direction }: SortState) {
    rows.sort_by(|a, b| {
        let ordering = column.compare(a, b);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

#[derive(Debug)]
pub struct TablePage<'a> {
    pub rows: Vec<&'a Student>,
    /// 1-based, already clamped into `1..=page_count`.
    pub page: usize,
    pub page_count: usize,
    pub total: usize,
}

impl TablePage<'_> {
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub const fn has_next(&self) -> bool {
        self.page < self.page_count
    }
}

pub fn paginate(rows: Vec<&Student>, page: usize, page_size: usize) -> TablePage<'_> {
    let page_size = page_size.max(1);
    let total = rows.len();
    let page_count = total.div_ceil(page_size).max(1);
    let page = page.clamp(1, page_count);

    let rows = rows
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .collect();

    TablePage {
        rows,
        page,
        page_count,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: &str, name: &str, date: &str) -> Student {
        Student {
            id: id.into(),
            name: name.into(),
            email: format!("{}@example.org", name.to_lowercase()),
            date_of_admission: date.into(),
            ..Student::default()
        }
    }

    fn ids(rows: &[&Student]) -> Vec<String> {
        rows.iter().map(|s| s.id.clone()).collect()
    }

    fn roster() -> Vec<Student> {
        vec![
            student("1", "Alice", "2024-09-01"),
            student("2", "bob", "2023-01-05"),
            student("3", "Malik", "unknown"),
            student("4", "ALIYA", "2022-03-10"),
        ]
    }

    #[test]
    fn filter_matches_case_insensitive_substrings_in_order() {
        let roster = roster();
        assert_eq!(ids(&filter_by_name(&roster, "ali")), ["1", "3", "4"]);
        assert_eq!(ids(&filter_by_name(&roster, "BOB")), ["2"]);
        assert!(filter_by_name(&roster, "zed").is_empty());
    }

    #[test]
    fn empty_query_keeps_everything() {
        let roster = roster();
        assert_eq!(ids(&filter_by_name(&roster, "")), ["1", "2", "3", "4"]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let roster = roster();
        for query in ["", "a", "ali", "LI", "nobody"] {
            let once = filter_by_name(&roster, query);
            let twice = filter_by_name(once.iter().copied(), query);
            assert_eq!(ids(&once), ids(&twice), "query {query:?}");
        }
    }

    #[test]
    fn single_alice_scenario() {
        let roster = vec![student("1", "Alice", "")];
        assert_eq!(filter_by_name(&roster, "ali"), vec![&roster[0]]);
        assert!(filter_by_name(&roster, "bob").is_empty());
    }

    #[test]
    fn sorts_names_ignoring_case() {
        let roster = roster();
        let mut rows = filter_by_name(&roster, "");
        sort_rows(&mut rows, SortState::default());
        assert_eq!(ids(&rows), ["1", "4", "2", "3"]);

        sort_rows(
            &mut rows,
            SortState {
                column: SortColumn::Name,
                direction: SortDirection::Descending,
            },
        );
        assert_eq!(ids(&rows), ["3", "2", "4", "1"]);
    }

    #[test]
    fn sorts_admission_dates_chronologically() {
        let roster = roster();
        let mut rows = filter_by_name(&roster, "");
        sort_rows(
            &mut rows,
            SortState {
                column: SortColumn::DateOfAdmission,
                direction: SortDirection::Ascending,
            },
        );
        assert_eq!(ids(&rows), ["4", "2", "1", "3"]);
    }

    #[test]
    fn sort_is_stable_for_ties() {
        let roster = vec![
            student("1", "Sam", ""),
            student("2", "sam", ""),
            student("3", "SAM", ""),
        ];
        let mut rows = filter_by_name(&roster, "");
        sort_rows(&mut rows, SortState::default());
        assert_eq!(ids(&rows), ["1", "2", "3"]);
    }

    #[test]
    fn clicking_toggles_or_switches_column() {
        let state = SortState::default();
        let flipped = state.clicked(SortColumn::Name);
        assert_eq!(flipped.direction, SortDirection::Descending);
        let switched = flipped.clicked(SortColumn::Email);
        assert_eq!(
            switched,
            SortState {
                column: SortColumn::Email,
                direction: SortDirection::Ascending
            }
        );
    }

    #[test]
    fn paginates_and_clamps() {
        let roster: Vec<_> = (0..25)
            .map(|i| student(&i.to_string(), &format!("S{i:02}"), ""))
            .collect();
        let rows = filter_by_name(&roster, "");

        let page = paginate(rows.clone(), 3, 10);
        assert_eq!(page.page, 3);
        assert_eq!(page.page_count, 3);
        assert_eq!(page.rows.len(), 5);
        assert!(page.has_previous());
        assert!(!page.has_next());

        let page = paginate(rows.clone(), 99, 10);
        assert_eq!(page.page, 3);

        let page = paginate(rows, 0, 10);
        assert_eq!(page.page, 1);
        assert_eq!(page.rows.len(), 10);
    }

    #[test]
    fn empty_roster_has_one_empty_page() {
        let page = paginate(vec![], 4, 10);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_count, 1);
        assert_eq!(page.total, 0);
        assert!(page.rows.is_empty());
    }
}
