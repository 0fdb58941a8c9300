use super::{props, GraphError, MemoryGraph, NodeId, Properties, PropertyValue};

const MOVIES: &[(&str, i64, &str)] = &[
    ("The Matrix", 1999, "Welcome to the Real World"),
    ("The Matrix Reloaded", 2003, "Free your mind"),
    ("Speed", 1994, "Get ready for rush hour"),
    ("Top Gun", 1986, "I feel the need, the need for speed."),
    ("Jerry Maguire", 1996, "The rest of his life begins now."),
    ("Cloud Atlas", 2012, "Everything is connected"),
    ("Nosferatu", 1922, "A symphony of horror"),
];

const PEOPLE: &[(&str, i64)] = &[
    ("Keanu Reeves", 1964),
    ("Carrie-Anne Moss", 1967),
    ("Laurence Fishburne", 1961),
    ("Lana Wachowski", 1965),
    ("Lilly Wachowski", 1967),
    ("Joel Silver", 1952),
    ("Jan de Bont", 1943),
    ("Tom Cruise", 1962),
    ("Kelly McGillis", 1957),
    ("Tony Scott", 1944),
    ("Renee Zellweger", 1969),
    ("Cameron Crowe", 1957),
    ("Tom Hanks", 1956),
    ("Jessica Thompson", 1980),
];

// (person, relation, movie, roles)
const RELATIONS: &[(&str, &str, &str, &[&str])] = &[
    ("Keanu Reeves", "ACTED_IN", "The Matrix", &["Neo"]),
    ("Carrie-Anne Moss", "ACTED_IN", "The Matrix", &["Trinity"]),
    ("Laurence Fishburne", "ACTED_IN", "The Matrix", &["Morpheus"]),
    ("Lana Wachowski", "DIRECTED", "The Matrix", &[]),
    ("Lilly Wachowski", "DIRECTED", "The Matrix", &[]),
    ("Joel Silver", "PRODUCED", "The Matrix", &[]),
    ("Keanu Reeves", "ACTED_IN", "The Matrix Reloaded", &["Neo"]),
    ("Carrie-Anne Moss", "ACTED_IN", "The Matrix Reloaded", &["Trinity"]),
    ("Lana Wachowski", "DIRECTED", "The Matrix Reloaded", &[]),
    ("Lilly Wachowski", "DIRECTED", "The Matrix Reloaded", &[]),
    ("Keanu Reeves", "ACTED_IN", "Speed", &["Jack Traven"]),
    ("Jan de Bont", "DIRECTED", "Speed", &[]),
    ("Tom Cruise", "ACTED_IN", "Top Gun", &["Maverick"]),
    ("Kelly McGillis", "ACTED_IN", "Top Gun", &["Charlie"]),
    ("Tony Scott", "DIRECTED", "Top Gun", &[]),
    ("Tom Cruise", "ACTED_IN", "Jerry Maguire", &["Jerry Maguire"]),
    ("Renee Zellweger", "ACTED_IN", "Jerry Maguire", &["Dorothy Boyd"]),
    ("Cameron Crowe", "DIRECTED", "Jerry Maguire", &[]),
    ("Cameron Crowe", "WROTE", "Jerry Maguire", &[]),
    ("Cameron Crowe", "PRODUCED", "Jerry Maguire", &[]),
    (
        "Tom Hanks",
        "ACTED_IN",
        "Cloud Atlas",
        &["Zachry", "Dr. Henry Goose", "Isaac Sachs", "Dermot Hoggins"],
    ),
    ("Lana Wachowski", "DIRECTED", "Cloud Atlas", &[]),
    ("Lilly Wachowski", "DIRECTED", "Cloud Atlas", &[]),
    ("Jessica Thompson", "REVIEWED", "Cloud Atlas", &[]),
];

/// Builds the demo movie graph.
///
/// Only `ACTED_IN` relations carry `roles`; `Nosferatu` has no cast at all,
/// and the reviewer's relation carries a summary instead of roles.
pub fn movie_graph() -> MemoryGraph {
    let mut graph = MemoryGraph::new();
    match populate(&mut graph) {
        Ok(()) => graph,
        Err(err) => unreachable!("demo relations reference declared nodes: {err}"),
    }
}

fn populate(graph: &mut MemoryGraph) -> Result<(), GraphError> {
    let mut movies: Vec<(&str, NodeId)> = Vec::with_capacity(MOVIES.len());
    for (title, released, tagline) in MOVIES {
        let mut properties = props([("title", *title), ("tagline", *tagline)]);
        properties.insert("released".into(), PropertyValue::Int(*released));
        movies.push((*title, graph.add_node(["Movie"], properties)));
    }
    let mut people: Vec<(&str, NodeId)> = Vec::with_capacity(PEOPLE.len());
    for (name, born) in PEOPLE {
        let mut properties = props([("name", *name)]);
        properties.insert("born".into(), PropertyValue::Int(*born));
        people.push((*name, graph.add_node(["Person"], properties)));
    }

    for (person, relation, movie, roles) in RELATIONS {
        let mut properties = Properties::new();
        if *relation == "ACTED_IN" {
            let roles = roles.iter().map(|r| (*r).to_owned()).collect::<Vec<_>>();
            properties.insert("roles".into(), PropertyValue::StringList(roles));
        }
        if *relation == "REVIEWED" {
            properties.insert("summary".into(), "An amazing journey".into());
            properties.insert("rating".into(), PropertyValue::Int(95));
        }
        graph.add_edge(
            lookup(&people, person),
            lookup(&movies, movie),
            *relation,
            properties,
        )?;
    }
    Ok(())
}

fn lookup(table: &[(&str, NodeId)], key: &str) -> NodeId {
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, id)| *id)
        .unwrap_or(usize::MAX)
}
