//! Filtering, sorting and pagination of the dataset into the rows on screen.

use std::cmp::Ordering;

use ratatui_records_core::record::FieldKey;
use ratatui_records_core::record::Record;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortState {
    pub field: FieldKey,
    pub direction: SortDirection,
}

/// Indices into the dataset, in display order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowView {
    /// Every row passing the filter, sorted. This is the pre-pagination row model.
    pub filtered: Vec<usize>,
    /// The rows of the current page.
    pub page: Vec<usize>,
    pub page_index: usize,
    pub page_count: usize,
}

impl RowView {
    /// 1-based range of the visible rows within `filtered`, or `None` when nothing is shown.
    pub fn visible_range(&self, page_size: usize) -> Option<(usize, usize)> {
        if self.page.is_empty() {
            return None;
        }
        let first = self.page_index * page_size + 1;
        Some((first, first + self.page.len() - 1))
    }
}

#[derive(Clone, Debug)]
pub struct RowModel {
    filter: String,
    sort: Option<SortState>,
    page_index: usize,
    page_size: usize,
    paginate: bool,
}

impl RowModel {
    pub fn new(page_size: usize, paginate: bool) -> Self {
        Self {
            filter: String::new(),
            sort: None,
            page_index: 0,
            page_size: page_size.max(1),
            paginate,
        }
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
        self.page_index = 0;
    }

    pub fn sort(&self) -> Option<SortState> {
        self.sort
    }

    /// Cycles `field` through ascending, descending and unsorted.
    pub fn toggle_sort(&mut self, field: FieldKey) {
        self.sort = match self.sort {
            Some(SortState {
                field: f,
                direction: SortDirection::Asc,
            }) if f == field => Some(SortState {
                field,
                direction: SortDirection::Desc,
            }),
            Some(SortState {
                field: f,
                direction: SortDirection::Desc,
            }) if f == field => None,
            _ => Some(SortState {
                field,
                direction: SortDirection::Asc,
            }),
        };
        self.page_index = 0;
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page_index = 0;
    }

    pub fn paginates(&self) -> bool {
        self.paginate
    }

    pub fn next_page(&mut self, filtered_len: usize) -> bool {
        if self.page_index + 1 < self.page_count(filtered_len) {
            self.page_index += 1;
            true
        } else {
            false
        }
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page_index > 0 {
            self.page_index -= 1;
            true
        } else {
            false
        }
    }

    pub fn page_count(&self, filtered_len: usize) -> usize {
        if !self.paginate {
            return 1;
        }
        filtered_len.div_ceil(self.page_size).max(1)
    }

    /// Applies filter, then sort, then pagination. `fields` are the columns searched by the filter.
    pub fn compute(&self, records: &[Record], fields: &[FieldKey]) -> RowView {
        let needle = self.filter.trim().to_lowercase();
        let mut filtered: Vec<usize> = records
            .iter()
            .enumerate()
            .filter(|(_, r)| {
                needle.is_empty()
                    || fields
                        .iter()
                        .any(|f| r.value(*f).to_lowercase().contains(&needle))
            })
            .map(|(i, _)| i)
            .collect();

        if let Some(sort) = self.sort {
            filtered.sort_by(|a, b| {
                let ord = compare_field(&records[*a], &records[*b], sort.field);
                match sort.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }

        let page_count = self.page_count(filtered.len());
        let page_index = self.page_index.min(page_count - 1);
        let page = if self.paginate {
            filtered
                .iter()
                .copied()
                .skip(page_index * self.page_size)
                .take(self.page_size)
                .collect()
        } else {
            filtered.clone()
        };

        RowView {
            filtered,
            page,
            page_index,
            page_count,
        }
    }
}

fn compare_field(a: &Record, b: &Record, field: FieldKey) -> Ordering {
    match field {
        FieldKey::Id => a.id.cmp(&b.id),
        FieldKey::Age => a.age.cmp(&b.age),
        FieldKey::Status => a.status.cmp(&b.status),
        _ => a
            .value(field)
            .to_lowercase()
            .cmp(&b.value(field).to_lowercase()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui_records_core::sample::sample_records;

    const SEARCHED: [FieldKey; 3] = [FieldKey::FirstName, FieldKey::LastName, FieldKey::Email];

    #[test]
    fn paginates_with_clamped_last_page() {
        let records = sample_records();
        let mut model = RowModel::new(4, true);
        assert_eq!(model.compute(&records, &SEARCHED).page, vec![0, 1, 2, 3]);
        assert!(model.next_page(records.len()));
        assert!(model.next_page(records.len()));
        assert!(!model.next_page(records.len()));
        let view = model.compute(&records, &SEARCHED);
        assert_eq!(view.page, vec![8, 9]);
        assert_eq!(view.page_count, 3);
        assert_eq!(view.visible_range(4), Some((9, 10)));
    }

    #[test]
    fn filter_is_case_insensitive_and_resets_page() {
        let records = sample_records();
        let mut model = RowModel::new(5, true);
        model.next_page(records.len());
        model.set_filter("SMITH");
        let view = model.compute(&records, &SEARCHED);
        assert_eq!(view.filtered, vec![1]);
        assert_eq!(view.page_index, 0);
    }

    #[test]
    fn sort_cycles_through_directions() {
        let records = sample_records();
        let mut model = RowModel::new(20, false);
        model.toggle_sort(FieldKey::Age);
        let asc = model.compute(&records, &SEARCHED).page;
        assert_eq!(records[asc[0]].age, 22);
        model.toggle_sort(FieldKey::Age);
        let desc = model.compute(&records, &SEARCHED).page;
        assert_eq!(records[desc[0]].age, 55);
        model.toggle_sort(FieldKey::Age);
        assert_eq!(model.sort(), None);
        assert_eq!(model.compute(&records, &SEARCHED).page, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn empty_filter_result_has_one_empty_page() {
        let records = sample_records();
        let mut model = RowModel::new(5, true);
        model.set_filter("nobody");
        let view = model.compute(&records, &SEARCHED);
        assert!(view.filtered.is_empty());
        assert_eq!(view.page_count, 1);
        assert_eq!(view.visible_range(5), None);
    }
}
