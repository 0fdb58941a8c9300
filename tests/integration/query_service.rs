#![allow(missing_docs)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reelgraph::{
    graph::{demo, import_csv, EdgeImportConfig, NodeImportConfig},
    model::{Movie, Person},
    query::{RoleColumn, Tuple},
    source::{BackendKind, MemorySource, Params, SourceError, Traversal, TupleSource},
    MovieService, Operation, QueryError, QueryOutput,
};

/// Replays a fixed row set and records what it was asked for.
struct ScriptedSource {
    rows: Result<Vec<Tuple>, fn() -> SourceError>,
    calls: Mutex<Vec<(Traversal, Params)>>,
}

impl ScriptedSource {
    fn rows(rows: Vec<Tuple>) -> Arc<Self> {
        Arc::new(Self {
            rows: Ok(rows),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn failing(err: fn() -> SourceError) -> Arc<Self> {
        Arc::new(Self {
            rows: Err(err),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<(Traversal, Params)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TupleSource for ScriptedSource {
    async fn execute(
        &self,
        traversal: Traversal,
        params: &Params,
    ) -> Result<Vec<Tuple>, SourceError> {
        self.calls.lock().unwrap().push((traversal, params.clone()));
        match &self.rows {
            Ok(rows) => Ok(rows.clone()),
            Err(make) => Err(make()),
        }
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Memory
    }
}

fn service(source: Arc<ScriptedSource>) -> MovieService {
    MovieService::new(source)
}

#[tokio::test]
async fn all_movies_groups_rows_by_title() {
    let source = ScriptedSource::rows(vec![
        Tuple::cast("Top Gun", "Tom", "acted", ["Maverick"]),
        Tuple::crew("Top Gun", "Tony", "directed"),
        Tuple::cast("Speed", "Keanu", "acted", ["Jack"]),
    ]);
    let movies = service(source.clone()).all_movies().await.unwrap();
    assert_eq!(
        movies,
        vec![
            Movie {
                title: "Top Gun".into(),
                cast: vec![
                    Person::new("Tom", "acted").with_roles(["Maverick"]),
                    Person::new("Tony", "directed"),
                ],
                ..Movie::default()
            },
            Movie {
                title: "Speed".into(),
                cast: vec![Person::new("Keanu", "acted").with_roles(["Jack"])],
                ..Movie::default()
            },
        ]
    );
    assert_eq!(source.calls(), vec![(Traversal::AllMovies, Params::new())]);
}

#[tokio::test]
async fn movie_without_cast_is_returned_empty() {
    let source = ScriptedSource::rows(vec![Tuple::placeholder("Silent Film")]);
    let movies = service(source).all_movies().await.unwrap();
    assert_eq!(movies, vec![Movie::new("Silent Film")]);
}

#[tokio::test]
async fn unknown_title_is_not_found() {
    let source = ScriptedSource::rows(Vec::new());
    let err = service(source.clone())
        .movie_by_title("Unknown")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "movie not found");

    let (traversal, params) = &source.calls()[0];
    assert_eq!(*traversal, Traversal::MovieByTitle);
    assert_eq!(params.get("title").map(String::as_str), Some("Unknown"));
}

#[tokio::test]
async fn list_operations_share_not_found_message() {
    let svc = service(ScriptedSource::rows(Vec::new()));
    for err in [
        svc.all_movies().await.unwrap_err(),
        svc.movies_within_hops("Top Gun").await.unwrap_err(),
        svc.movies_by_director("Tony Scott").await.unwrap_err(),
        svc.movies_by_actor("Tom Cruise").await.unwrap_err(),
    ] {
        assert_eq!(err.to_string(), "no movies found");
    }
}

#[tokio::test]
async fn person_operations_bind_name_parameter() {
    let source = ScriptedSource::rows(vec![Tuple::placeholder("Top Gun")]);
    let svc = service(source.clone());
    svc.movies_by_director("Tony Scott").await.unwrap();
    svc.movies_by_actor("Tom Cruise").await.unwrap();
    let calls = source.calls();
    assert_eq!(calls[0].0, Traversal::ByDirector);
    assert_eq!(calls[0].1.get("name").map(String::as_str), Some("Tony Scott"));
    assert_eq!(calls[1].0, Traversal::ByActor);
    assert_eq!(calls[1].1.get("name").map(String::as_str), Some("Tom Cruise"));
}

#[tokio::test]
async fn by_title_returns_first_group_only() {
    let source = ScriptedSource::rows(vec![
        Tuple::placeholder("Twin"),
        Tuple::crew("Other", "P", "directed"),
    ]);
    let movie = service(source).movie_by_title("Twin").await.unwrap();
    assert_eq!(movie, Movie::new("Twin"));
}

#[tokio::test]
async fn bad_row_halts_the_operation() {
    let source = ScriptedSource::rows(vec![
        Tuple::placeholder("Fine"),
        Tuple {
            title: "Broken".into(),
            name: Some("Nobody".into()),
            job: None,
            role: RoleColumn::Unexpected,
        },
    ]);
    let err = service(source).all_movies().await.unwrap_err();
    assert!(err.is_data_contract());
    assert_eq!(
        err.to_string(),
        "data contract violation: row for movie 'Broken' is missing required column 'job'"
    );
}

#[tokio::test]
async fn upstream_failures_propagate() {
    let source = ScriptedSource::failing(|| SourceError::MissingParameter {
        traversal: Traversal::ByActor,
        name: "name",
    });
    let err = service(source).movies_by_actor("Keanu").await.unwrap_err();
    assert!(matches!(err, QueryError::Upstream(_)));
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn malformed_rows_are_data_contract_violations() {
    let source = ScriptedSource::failing(|| SourceError::MalformedRow {
        column: "title",
        reason: "is null".into(),
    });
    let err = service(source).all_movies().await.unwrap_err();
    assert!(err.is_data_contract());
}

#[tokio::test]
async fn memory_backend_answers_every_operation() {
    let svc = MovieService::new(Arc::new(MemorySource::new(demo::movie_graph())));

    let all = svc.all_movies().await.unwrap();
    assert_eq!(all.len(), 7);
    assert!(all.iter().any(|m| m.title == "Nosferatu" && m.cast.is_empty()));

    let matrix = svc.movie_by_title("The Matrix").await.unwrap();
    assert_eq!(matrix.cast.len(), 6);
    assert_eq!(
        matrix.cast[0],
        Person::new("Keanu Reeves", "acted").with_roles(["Neo"])
    );
    assert_eq!(matrix.cast[3], Person::new("Lana Wachowski", "directed"));

    let related = svc.movies_within_hops("Top Gun").await.unwrap();
    let titles: Vec<&str> = related.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, ["Jerry Maguire"]);
    assert_eq!(related[0].cast.len(), 5);

    let directed = svc.movies_by_director("Jan de Bont").await.unwrap();
    assert_eq!(directed.len(), 1);
    assert_eq!(directed[0].title, "Speed");

    let acted = svc.movies_by_actor("Tom Hanks").await.unwrap();
    assert_eq!(
        acted[0].cast[0].role.as_deref(),
        Some(
            &[
                "Zachry".to_string(),
                "Dr. Henry Goose".to_string(),
                "Isaac Sachs".to_string(),
                "Dermot Hoggins".to_string()
            ][..]
        )
    );

    let err = svc.movies_within_hops("Nosferatu").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn run_returns_single_or_list_output() {
    let svc = MovieService::new(Arc::new(MemorySource::new(demo::movie_graph())));
    let single = svc
        .run(&Operation::MovieByTitle {
            title: "Speed".into(),
        })
        .await
        .unwrap();
    assert!(matches!(single, QueryOutput::Movie(_)));
    let list = svc
        .run(&Operation::ByActor {
            name: "Keanu Reeves".into(),
        })
        .await
        .unwrap();
    assert_eq!(list.movies().len(), 3);
}

#[tokio::test]
async fn numeric_titles_from_csv_are_queryable() {
    let dir = tempfile::tempdir().unwrap();
    let nodes = dir.path().join("nodes.csv");
    let edges = dir.path().join("edges.csv");
    std::fs::write(
        &nodes,
        "id,labels,title,name\nm1,Movie,1917,\nm2,Movie,Speed,\np1,Person,,Sam Mendes\n",
    )
    .unwrap();
    std::fs::write(&edges, "src,dst,type,roles\np1,m1,DIRECTED,\n").unwrap();
    let (graph, _) = import_csv(
        &NodeImportConfig::new(nodes),
        Some(&EdgeImportConfig::new(edges)),
    )
    .unwrap();
    let svc = MovieService::new(Arc::new(MemorySource::new(graph)));

    let all = svc.all_movies().await.unwrap();
    let titles: Vec<&str> = all.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, ["1917", "Speed"]);

    let movie = svc.movie_by_title("1917").await.unwrap();
    assert_eq!(movie.cast, [Person::new("Sam Mendes", "directed")]);

    let directed = svc.movies_by_director("Sam Mendes").await.unwrap();
    assert_eq!(directed.len(), 1);
    assert_eq!(directed[0].title, "1917");
}
