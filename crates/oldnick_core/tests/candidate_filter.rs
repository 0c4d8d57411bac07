use oldnick_core::db::open_db_in_memory;
use oldnick_core::{
    candidates, is_candidate, person_needs_update, PersonRecord, RecordStore, SqliteRecordStore,
};
use proptest::prelude::*;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy)]
enum Shape {
    Plain,
    QuotedOwn,
    QuotedOther,
    NoSlash,
    SingleSlash,
}

#[derive(Debug, Clone)]
struct NameSpec {
    given: String,
    surname: String,
    nick: Option<String>,
    shape: Shape,
}

impl NameSpec {
    fn render(&self) -> String {
        let own = self.nick.clone().unwrap_or_default();
        let value = match self.shape {
            Shape::Plain => format!("{} /{}/", self.given, self.surname),
            Shape::QuotedOwn => format!("{} \"{own}\" /{}/", self.given, self.surname),
            Shape::QuotedOther => format!("{} \"Other\" /{}/", self.given, self.surname),
            Shape::NoSlash => format!("{} {}", self.given, self.surname),
            Shape::SingleSlash => format!("{} /{}", self.given, self.surname),
        };
        match &self.nick {
            Some(nick) if nick.is_empty() => format!("1 NAME {value}\n2 NICK"),
            Some(nick) => format!("1 NAME {value}\n2 GIVN {}\n2 NICK {nick}", self.given),
            None => format!("1 NAME {value}"),
        }
    }
}

fn shapes(with_quoted_other: bool) -> BoxedStrategy<Shape> {
    if with_quoted_other {
        prop_oneof![
            Just(Shape::Plain),
            Just(Shape::QuotedOwn),
            Just(Shape::QuotedOther),
            Just(Shape::NoSlash),
            Just(Shape::SingleSlash),
        ]
        .boxed()
    } else {
        prop_oneof![
            Just(Shape::Plain),
            Just(Shape::QuotedOwn),
            Just(Shape::NoSlash),
            Just(Shape::SingleSlash),
        ]
        .boxed()
    }
}

fn name_specs(with_quoted_other: bool) -> impl Strategy<Value = NameSpec> {
    (
        "[A-Z][a-z]{1,6}",
        "[A-Z][a-z]{1,8}",
        prop::option::of(prop_oneof![Just(String::new()), "[A-Za-z .'/-]{1,8}"]),
        shapes(with_quoted_other),
    )
        .prop_map(|(given, surname, nick, shape)| NameSpec {
            given,
            surname,
            nick,
            shape,
        })
}

fn population(with_quoted_other: bool) -> impl Strategy<Value = Vec<PersonRecord>> {
    prop::collection::vec(prop::collection::vec(name_specs(with_quoted_other), 0..4), 1..12)
        .prop_map(|people| {
            people
                .into_iter()
                .enumerate()
                .map(|(index, names)| {
                    let id = format!("I{index}");
                    let mut lines = vec![format!("0 @{id}@ INDI")];
                    lines.extend(names.iter().map(NameSpec::render));
                    lines.push("1 SEX U".to_string());
                    PersonRecord::new(id, lines.join("\n"))
                })
                .collect()
        })
}

fn sql_candidates(population: &[PersonRecord]) -> BTreeSet<String> {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteRecordStore::try_new(&mut conn).unwrap();
    for person in population {
        store.put_person(person).unwrap();
    }
    store.candidates().unwrap().into_iter().collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn candidates_cover_every_person_needing_update(people in population(false)) {
        let selected = candidates(&people);
        for person in &people {
            if person_needs_update(person) {
                prop_assert!(
                    selected.contains(&person.id),
                    "missed {}:\n{}",
                    person.id,
                    person.gedcom
                );
            }
        }
    }

    #[test]
    fn sql_scan_matches_in_memory_filter(people in population(true)) {
        prop_assert_eq!(sql_candidates(&people), candidates(&people));
    }
}

#[test]
fn sql_scan_matches_in_memory_filter_on_edge_cases() {
    let people = vec![
        PersonRecord::new("I1", "0 @I1@ INDI\n1 NAME John /Smith/\n2 nick Jack"),
        PersonRecord::new("I2", "0 @I2@ INDI\n1 NAME John /Smith/\n2 NICK \n2 SOUR @S1@"),
        PersonRecord::new("I3", "0 @I3@ INDI\n1 NAME /Smith/\n2 NICK Jack"),
        PersonRecord::new("I4", "0 @I4@ INDI\n1 SEX M"),
        PersonRecord::new(
            "I5",
            "0 @I5@ INDI\n1 NAME John \"J\" /Smith/\n2 NICK Jack\n1 NAME Jon Smith",
        ),
        // Padded, signed and indented levels are not NICK sub-fields.
        PersonRecord::new("I6", "0 @I6@ INDI\n1 NAME John /Smith/\n02 NICK Jack"),
        PersonRecord::new("I7", "0 @I7@ INDI\n1 NAME John /Smith/\n+2 NICK Jack"),
        PersonRecord::new("I8", "0 @I8@ INDI\n1 NAME John /Smith/\n  2 NICK Jack"),
    ];

    let expected: BTreeSet<String> = ["I1", "I2", "I5"].iter().map(|id| id.to_string()).collect();
    assert_eq!(candidates(&people), expected);
    assert_eq!(sql_candidates(&people), expected);
    for person in &people {
        assert!(
            !person_needs_update(person) || is_candidate(person),
            "{} needs an update but the scan misses it",
            person.id
        );
    }
}

#[test]
fn quoted_token_on_every_name_hides_person_from_scan() {
    // Coarse exclusion: any quoted token before the surname counts, even
    // when it is not this nickname.
    let person = PersonRecord::new(
        "I1",
        "0 @I1@ INDI\n1 NAME John \"Bob\" /Smith/\n2 NICK Jack",
    );
    assert!(person_needs_update(&person));
    assert!(!is_candidate(&person));
}
