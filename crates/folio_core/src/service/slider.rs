//! Impactful-people slider: columns, selection, and the rendered view.
//!
//! # Responsibility
//! - Turn a fetched people list into rotated, looping display columns.
//! - Own the `Browsing` / `Detail(person)` selection state machine.
//! - Drive one fetch activation per session and reflect its outcome.
//!
//! # Invariants
//! - Columns are derived once per resolved list and never mutated afterwards.
//! - Columns share `Arc<PersonRecord>` handles with the source list.
//! - Selecting and closing never refetch or touch the source list.
//! - A failed fetch renders its message and skips partitioning.

use crate::model::person::{PersonId, PersonRecord};
use crate::repo::person_repo::{PersonSource, PEOPLE_TABLE};
use crate::service::fetch::{Activation, FetchState};
use crate::service::partition::{looped, partition, BaseOrder, DEFAULT_COLUMN_COUNT};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Message shown when the people read fails.
pub fn load_failed_message() -> String {
    format!(
        "Failed to load data. Check Supabase table \"{PEOPLE_TABLE}\" and RLS policies."
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SliderError {
    /// The list has not resolved successfully.
    NotReady,
    /// A detail view is already open; close it first.
    NotBrowsing,
    UnknownPerson(PersonId),
}

impl Display for SliderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotReady => f.write_str("people list is not loaded"),
            Self::NotBrowsing => f.write_str("a person is already selected"),
            Self::UnknownPerson(id) => write!(f, "no person with id {id}"),
        }
    }
}

impl Error for SliderError {}

/// Selection state owned by the slider.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Browsing,
    Detail(Arc<PersonRecord>),
}

/// Scroll direction of one strip; alternates by column index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// One rendered card instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    /// Unique per instance: `{column}-{id}-{index}`.
    pub key: String,
    pub person: Arc<PersonRecord>,
}

/// One looping strip of cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnStrip {
    pub index: usize,
    pub direction: ScrollDirection,
    pub cards: Vec<Card>,
}

/// What the shell should draw right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SliderView {
    Loading,
    Failed { message: String },
    /// Successful empty read: draw nothing.
    Empty,
    Browsing { columns: Vec<ColumnStrip> },
    Detail { person: Arc<PersonRecord> },
}

impl SliderView {
    /// Number of card nodes in this view (the detail card counts as one).
    pub fn card_count(&self) -> usize {
        match self {
            Self::Browsing { columns } => columns.iter().map(|column| column.cards.len()).sum(),
            Self::Detail { .. } => 1,
            Self::Loading | Self::Failed { .. } | Self::Empty => 0,
        }
    }
}

enum Source {
    Loading,
    Failed(String),
    Ready {
        people: Arc<[Arc<PersonRecord>]>,
        columns: Vec<Vec<Arc<PersonRecord>>>,
    },
}

/// Slider model, independent of how the list is fetched.
pub struct Slider {
    order: Box<dyn BaseOrder>,
    column_count: usize,
    source: Source,
    selection: Selection,
}

impl Slider {
    pub fn new(order: impl BaseOrder + 'static) -> Self {
        Self {
            order: Box::new(order),
            column_count: DEFAULT_COLUMN_COUNT,
            source: Source::Loading,
            selection: Selection::Browsing,
        }
    }

    pub fn with_column_count(mut self, column_count: usize) -> Self {
        self.column_count = column_count;
        self
    }

    /// Feeds a fetch outcome; columns are rebuilt only for a new list.
    pub fn apply(&mut self, state: &FetchState<Vec<PersonRecord>>) {
        match state {
            FetchState::Loading => {
                self.source = Source::Loading;
                self.selection = Selection::Browsing;
            }
            FetchState::Failed(message) => {
                self.source = Source::Failed(message.clone());
                self.selection = Selection::Browsing;
            }
            FetchState::Ready(list) => {
                if self.holds_list(list) {
                    return;
                }
                let people: Arc<[Arc<PersonRecord>]> =
                    list.iter().cloned().map(Arc::new).collect();
                let columns = partition(&people[..], self.column_count, self.order.as_mut());
                info!(
                    "event=slider_partition module=slider status=ok people={} columns={}",
                    people.len(),
                    columns.len()
                );
                self.source = Source::Ready { people, columns };
                self.selection = Selection::Browsing;
            }
        }
    }

    /// `Browsing -> Detail(person)` for any person in the resolved list.
    ///
    /// An exact id match wins; otherwise ids compare by rendered form, so a
    /// text id `"42"` is selectable through a parsed `Int(42)`.
    pub fn select(&mut self, id: &PersonId) -> Result<(), SliderError> {
        let Source::Ready { people, .. } = &self.source else {
            return Err(SliderError::NotReady);
        };
        if !matches!(self.selection, Selection::Browsing) {
            return Err(SliderError::NotBrowsing);
        }
        let person = people
            .iter()
            .find(|person| &person.id == id)
            .or_else(|| people.iter().find(|person| person.id.same_rendering(id)))
            .cloned()
            .ok_or_else(|| SliderError::UnknownPerson(id.clone()))?;
        self.selection = Selection::Detail(person);
        Ok(())
    }

    /// `Detail(_) -> Browsing`; returns whether a detail view was closed.
    pub fn close(&mut self) -> bool {
        let was_detail = matches!(self.selection, Selection::Detail(_));
        self.selection = Selection::Browsing;
        was_detail
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Derived columns (empty until the list resolves).
    pub fn columns(&self) -> &[Vec<Arc<PersonRecord>>] {
        match &self.source {
            Source::Ready { columns, .. } => columns,
            Source::Loading | Source::Failed(_) => &[],
        }
    }

    pub fn view(&self) -> SliderView {
        match &self.source {
            Source::Loading => SliderView::Loading,
            Source::Failed(message) => SliderView::Failed {
                message: message.clone(),
            },
            Source::Ready { people, .. } if people.is_empty() => SliderView::Empty,
            Source::Ready { columns, .. } => match &self.selection {
                Selection::Detail(person) => SliderView::Detail {
                    person: Arc::clone(person),
                },
                Selection::Browsing => SliderView::Browsing {
                    columns: columns
                        .iter()
                        .enumerate()
                        .map(|(index, column)| strip(index, column))
                        .collect(),
                },
            },
        }
    }

    fn holds_list(&self, list: &[PersonRecord]) -> bool {
        match &self.source {
            Source::Ready { people, .. } => {
                people.len() == list.len()
                    && people.iter().zip(list).all(|(held, new)| held.as_ref() == new)
            }
            Source::Loading | Source::Failed(_) => false,
        }
    }
}

fn strip(index: usize, column: &[Arc<PersonRecord>]) -> ColumnStrip {
    let cards = looped(column)
        .into_iter()
        .enumerate()
        .map(|(position, person)| Card {
            key: format!("{index}-{}-{position}", person.id),
            person,
        })
        .collect();
    ColumnStrip {
        index,
        direction: if index % 2 == 0 {
            ScrollDirection::Up
        } else {
            ScrollDirection::Down
        },
        cards,
    }
}

/// Starts one people read against `source`.
///
/// The underlying error is logged; the activation carries the user-facing
/// failure message.
pub fn load_people(source: Arc<dyn PersonSource>) -> Activation<Vec<PersonRecord>> {
    Activation::spawn("impactful_people", move |_| {
        source.list_persons().map_err(|err| {
            error!("event=people_load module=slider status=error error={err}");
            load_failed_message()
        })
    })
}

/// A slider bound to its data source for one mounted lifetime.
pub struct SliderSession {
    source: Arc<dyn PersonSource>,
    activation: Activation<Vec<PersonRecord>>,
    slider: Slider,
}

impl SliderSession {
    /// Activates: issues the read and starts in `Loading`.
    pub fn open(source: Arc<dyn PersonSource>, order: impl BaseOrder + 'static) -> Self {
        let activation = load_people(Arc::clone(&source));
        Self {
            source,
            activation,
            slider: Slider::new(order),
        }
    }

    pub fn with_column_count(mut self, column_count: usize) -> Self {
        self.slider = self.slider.with_column_count(column_count);
        self
    }

    /// Picks up a finished read without blocking and returns the view.
    pub fn poll(&mut self) -> SliderView {
        let state = self.activation.poll();
        if !state.is_loading() {
            self.slider.apply(state);
        }
        self.slider.view()
    }

    /// Blocks until the read resolves and returns the view.
    pub fn wait(&mut self) -> SliderView {
        let state = self.activation.wait();
        if !state.is_loading() {
            self.slider.apply(state);
        }
        self.slider.view()
    }

    pub fn select(&mut self, id: &PersonId) -> Result<SliderView, SliderError> {
        self.slider.select(id)?;
        Ok(self.slider.view())
    }

    pub fn close(&mut self) -> SliderView {
        self.slider.close();
        self.slider.view()
    }

    /// Re-activation: discards the current read and issues a fresh one.
    pub fn reload(&mut self) -> SliderView {
        self.activation.deactivate();
        self.activation = load_people(Arc::clone(&self.source));
        self.slider.apply(&FetchState::Loading);
        self.slider.view()
    }

    /// Tears the session down; a late result is discarded.
    pub fn deactivate(&mut self) {
        self.activation.deactivate();
    }

    pub fn slider(&self) -> &Slider {
        &self.slider
    }
}

#[cfg(test)]
mod tests {
    use super::{ScrollDirection, Selection, Slider, SliderError, SliderView};
    use crate::model::person::{PersonId, PersonRecord};
    use crate::service::fetch::FetchState;
    use crate::service::partition::NaturalOrder;

    fn people() -> Vec<PersonRecord> {
        vec![
            PersonRecord::new(1, "A"),
            PersonRecord::new(2, "B"),
            PersonRecord::new(3, "C"),
        ]
    }

    fn names(column: &[std::sync::Arc<PersonRecord>]) -> Vec<&str> {
        column.iter().map(|person| person.name.as_str()).collect()
    }

    #[test]
    fn natural_order_two_columns() {
        let mut slider = Slider::new(NaturalOrder).with_column_count(2);
        slider.apply(&FetchState::Ready(people()));
        assert_eq!(names(&slider.columns()[0]), vec!["A", "B", "C"]);
        assert_eq!(names(&slider.columns()[1]), vec!["B", "C", "A"]);
    }

    #[test]
    fn browsing_view_loops_each_column_with_unique_keys() {
        let mut slider = Slider::new(NaturalOrder).with_column_count(2);
        slider.apply(&FetchState::Ready(people()));
        let SliderView::Browsing { columns } = slider.view() else {
            panic!("expected browsing view");
        };
        assert_eq!(columns[0].direction, ScrollDirection::Up);
        assert_eq!(columns[1].direction, ScrollDirection::Down);
        assert_eq!(columns[1].cards.len(), 6);
        assert_eq!(columns[1].cards[0].key, "1-2-0");
        assert_eq!(columns[1].cards[3].key, "1-2-3");
        assert_eq!(slider.columns()[1].len(), 3);
    }

    #[test]
    fn columns_share_records_with_each_other() {
        let mut slider = Slider::new(NaturalOrder).with_column_count(2);
        slider.apply(&FetchState::Ready(people()));
        let first = &slider.columns()[0][1];
        let second = &slider.columns()[1][0];
        assert!(std::sync::Arc::ptr_eq(first, second));
    }

    #[test]
    fn select_from_browsing_then_close() {
        let mut slider = Slider::new(NaturalOrder);
        slider.apply(&FetchState::Ready(people()));
        let before = slider.view();

        slider.select(&PersonId::Int(2)).expect("person 2 is listed");
        match slider.selection() {
            Selection::Detail(person) => assert_eq!(person.name, "B"),
            Selection::Browsing => panic!("expected detail"),
        }
        assert_eq!(slider.view().card_count(), 1);
        assert_eq!(
            slider.select(&PersonId::Int(3)),
            Err(SliderError::NotBrowsing)
        );

        assert!(slider.close());
        assert_eq!(slider.view(), before);
        assert!(!slider.close());
    }

    #[test]
    fn select_rejects_unknown_ids_and_unresolved_lists() {
        let mut slider = Slider::new(NaturalOrder);
        assert_eq!(slider.select(&PersonId::Int(1)), Err(SliderError::NotReady));
        slider.apply(&FetchState::Ready(people()));
        assert_eq!(
            slider.select(&PersonId::Int(9)),
            Err(SliderError::UnknownPerson(PersonId::Int(9)))
        );
        assert_eq!(slider.selection(), &Selection::Browsing);
    }

    #[test]
    fn numeric_looking_text_id_is_selectable_by_its_rendering() {
        let mut slider = Slider::new(NaturalOrder);
        slider.apply(&FetchState::Ready(vec![
            PersonRecord::new("42", "Text id"),
            PersonRecord::new(7, "Int id"),
        ]));
        let parsed = PersonId::parse("42").expect("non-empty id");
        assert_eq!(parsed, PersonId::Int(42));

        slider.select(&parsed).expect("card id 42 is listed");
        match slider.selection() {
            Selection::Detail(person) => assert_eq!(person.name, "Text id"),
            Selection::Browsing => panic!("expected detail"),
        }
    }

    #[test]
    fn exact_id_match_wins_over_rendering_match() {
        let mut slider = Slider::new(NaturalOrder);
        slider.apply(&FetchState::Ready(vec![
            PersonRecord::new("5", "Text five"),
            PersonRecord::new(5, "Int five"),
        ]));
        slider.select(&PersonId::Int(5)).unwrap();
        match slider.selection() {
            Selection::Detail(person) => assert_eq!(person.name, "Int five"),
            Selection::Browsing => panic!("expected detail"),
        }
    }

    #[test]
    fn empty_list_renders_nothing() {
        let mut slider = Slider::new(NaturalOrder);
        slider.apply(&FetchState::Ready(Vec::new()));
        assert_eq!(slider.view(), SliderView::Empty);
        assert_eq!(slider.view().card_count(), 0);
        assert_eq!(slider.columns().len(), 6);
        assert!(slider.columns().iter().all(Vec::is_empty));
    }

    #[test]
    fn failure_skips_partitioning() {
        let mut slider = Slider::new(NaturalOrder);
        slider.apply(&FetchState::Failed("Failed to load data.".to_string()));
        assert!(slider.columns().is_empty());
        assert!(matches!(slider.view(), SliderView::Failed { .. }));
    }

    #[test]
    fn same_list_keeps_columns_and_selection() {
        let mut slider = Slider::new(NaturalOrder);
        slider.apply(&FetchState::Ready(people()));
        slider.select(&PersonId::Int(1)).unwrap();
        slider.apply(&FetchState::Ready(people()));
        assert!(matches!(slider.selection(), Selection::Detail(_)));

        let mut changed = people();
        changed.push(PersonRecord::new(4, "D"));
        slider.apply(&FetchState::Ready(changed));
        assert_eq!(slider.selection(), &Selection::Browsing);
        assert_eq!(slider.columns()[0].len(), 4);
    }
}
