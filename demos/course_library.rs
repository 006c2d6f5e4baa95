//! Course library API with data shaping and hypermedia
//!
//! This example demonstrates:
//! - Field selection on items and collections (`?fields=id,name`)
//! - Sorting over logical keys (`?orderBy=age desc,name`)
//! - Paging with the `X-Pagination` header
//! - Friendly/full variants and links selected through `Accept`
//!
//! Try:
//! ```text
//! curl -H 'Accept: application/vnd.marvin.hateoas+json' \
//!     'http://localhost:5000/api/authors?fields=id,name&orderBy=age%20desc&pageSize=2'
//! curl -H 'Accept: application/vnd.marvin.author.full+json' \
//!     'http://localhost:5000/api/authors?mainCategory=Rum'
//! ```

use anyhow::Result;
use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use chrono::TimeZone;
use serde::Deserialize;
use shape::prelude::*;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Storage model
#[derive(Debug, Clone)]
struct Author {
    id: Uuid,
    first_name: String,
    last_name: String,
    date_of_birth: DateTime<Utc>,
    date_of_death: Option<DateTime<Utc>>,
    main_category: String,
}

/// Friendly representation
struct AuthorDto {
    id: Uuid,
    name: String,
    age: i32,
    main_category: String,
}

impl From<&Author> for AuthorDto {
    fn from(author: &Author) -> Self {
        Self {
            id: author.id,
            name: format!("{} {}", author.first_name, author.last_name),
            age: current_age(author.date_of_birth, author.date_of_death, Utc::now()),
            main_category: author.main_category.clone(),
        }
    }
}

impl_shapeable!(AuthorDto, "author", {
    "Id" => |a| a.id,
    "Name" => |a| a.name.clone(),
    "Age" => |a| a.age,
    "MainCategory" => |a| a.main_category.clone(),
});

/// Full representation: the storage model as is
struct AuthorFull(Author);

impl_shapeable!(AuthorFull, "author", {
    "Id" => |a| a.0.id,
    "FirstName" => |a| a.0.first_name.clone(),
    "LastName" => |a| a.0.last_name.clone(),
    "DateOfBirth" => |a| a.0.date_of_birth,
    "DateOfDeath" => |a| a.0.date_of_death,
    "MainCategory" => |a| a.0.main_category.clone(),
});

trait HasId {
    fn id(&self) -> Uuid;
}

impl HasId for AuthorDto {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl HasId for AuthorFull {
    fn id(&self) -> Uuid {
        self.0.id
    }
}

#[derive(Clone)]
struct AppState {
    projector: Projector,
    authors: Arc<Vec<Author>>,
}

#[derive(Debug, Default, Deserialize)]
struct ItemQuery {
    fields: Option<String>,
}

fn compare(a: &Author, b: &Author, sort: &SortSpec) -> Ordering {
    sort.fields()
        .iter()
        .map(|field| {
            let ordering = match field.field.as_str() {
                "Id" => a.id.cmp(&b.id),
                "FirstName" => a.first_name.cmp(&b.first_name),
                "LastName" => a.last_name.cmp(&b.last_name),
                "DateOfBirth" => a.date_of_birth.cmp(&b.date_of_birth),
                "MainCategory" => a.main_category.cmp(&b.main_category),
                _ => Ordering::Equal,
            };
            if field.descending {
                ordering.reverse()
            } else {
                ordering
            }
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Filter, sort and page the in-memory store, as a database would
fn fetch_page<'a>(authors: &'a [Author], request: &PreparedRequest) -> PagedList<&'a Author> {
    let params = &request.params;
    let mut matching: Vec<&Author> = authors
        .iter()
        .filter(|a| {
            params
                .category
                .as_deref()
                .is_none_or(|category| a.main_category.eq_ignore_ascii_case(category.trim()))
        })
        .filter(|a| {
            params.search_query.as_deref().is_none_or(|query| {
                let query = query.trim();
                a.main_category.contains(query)
                    || a.first_name.contains(query)
                    || a.last_name.contains(query)
            })
        })
        .collect();
    matching.sort_by(|a, b| compare(a, b, &request.sort));

    let total = matching.len() as u64;
    let skip = (params.page_number as usize - 1) * params.page_size as usize;
    let items = matching
        .into_iter()
        .skip(skip)
        .take(params.page_size as usize)
        .collect();
    PagedList::new(items, params.page_number, params.page_size, total)
}

fn respond_collection<T: Shapeable + HasId>(
    state: &AppState,
    params: ResourceParameters,
    headers: &HeaderMap,
    convert: impl Fn(&Author) -> T,
) -> ProjectionResult<Response> {
    let prepared = state.projector.prepare::<T>("Author", params, headers)?;
    let page = fetch_page(&state.authors, &prepared);
    let shaped = PagedList {
        items: page.iter().map(|&author| convert(author)).collect(),
        meta: page.meta,
    };

    let response = state.projector.collection(
        &shaped,
        &prepared,
        &RouteParams::new(),
        |item| item.id().to_string(),
    )?;
    Ok(response.into_response())
}

async fn get_authors(
    State(state): State<AppState>,
    Query(params): Query<ResourceParameters>,
    headers: HeaderMap,
) -> Result<Response, ProjectionError> {
    let representation = state.projector.negotiator().negotiate_headers(&headers)?;
    match representation.variant {
        Variant::Full => respond_collection(&state, params, &headers, |a| AuthorFull(a.clone())),
        Variant::Friendly => respond_collection(&state, params, &headers, |a| AuthorDto::from(a)),
    }
}

fn respond_item<T: Shapeable>(
    state: &AppState,
    item: T,
    id: Uuid,
    fields: Option<&str>,
    representation: &Representation,
) -> ProjectionResult<Response> {
    validate_fields::<T>(fields)?;
    let response = state
        .projector
        .item(&item, &RouteParams::new(), &id.to_string(), fields, representation)?;
    Ok(response.into_response())
}

async fn get_author(
    State(state): State<AppState>,
    Path(author_id): Path<Uuid>,
    Query(query): Query<ItemQuery>,
    headers: HeaderMap,
) -> Result<Response, ProjectionError> {
    let representation = state.projector.negotiator().negotiate_headers(&headers)?;
    let Some(author) = state.authors.iter().find(|a| a.id == author_id) else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    let fields = query.fields.as_deref();
    match representation.variant {
        Variant::Full => {
            respond_item(&state, AuthorFull(author.clone()), author_id, fields, &representation)
        }
        Variant::Friendly => {
            respond_item(&state, AuthorDto::from(author), author_id, fields, &representation)
        }
    }
}

async fn get_author_collection(
    State(state): State<AppState>,
    Path(ids): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ProjectionError> {
    let representation = state.projector.negotiator().negotiate_headers(&headers)?;
    let Some(ids) = parse_id_list(Some(ids.trim_start_matches('(').trim_end_matches(')')))?
    else {
        return Ok(StatusCode::BAD_REQUEST.into_response());
    };

    let authors: Vec<AuthorDto> = ids
        .iter()
        .filter_map(|id| state.authors.iter().find(|a| a.id == *id))
        .map(AuthorDto::from)
        .collect();
    if authors.len() != ids.len() {
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    let records = shape_all(&authors, None)?;
    Ok(ShapedResponse::new(records, &representation).into_response())
}

async fn get_root(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ProjectionError> {
    let representation = state.projector.negotiator().negotiate_headers(&headers)?;
    Ok(state.projector.root(&representation)?.into_response())
}

fn seed() -> Vec<Author> {
    let date = |y, m, d| Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).single();
    let author = |first: &str, last: &str, born, died, category: &str| Author {
        id: Uuid::new_v4(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        date_of_birth: born,
        date_of_death: died,
        main_category: category.to_string(),
    };

    [
        ("Berry", "Griffin Beak Eldritch", date(1650, 7, 23), None, "Ships"),
        ("Nancy", "Swashbuckler Rye", date(1668, 5, 21), None, "Rum"),
        ("Eli", "Ivory Bones Sweet", date(1701, 12, 16), None, "Singing"),
        ("Arnold", "The Unseen Stafford", date(1702, 3, 6), None, "Singing"),
        ("Seabury", "Toxic Reyes", date(1690, 11, 23), None, "Maps"),
        ("Rachel", "Red Wine Roberts", date(1723, 3, 6), None, "Rum"),
        ("Huxford", "The Hive Scully", date(1650, 2, 14), date(1703, 4, 1), "Ships"),
    ]
    .into_iter()
    .filter_map(|(first, last, born, died, category)| {
        Some(author(first, last, born?, died, category))
    })
    .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,shape=debug")),
        )
        .init();

    let config = match std::env::var("SHAPE_CONFIG") {
        Ok(path) => ProjectionConfig::from_yaml_file(&path)?,
        Err(_) => ProjectionConfig::default_config(),
    };

    let state = AppState {
        projector: Projector::from_config(config)?,
        authors: Arc::new(seed()),
    };
    for author in state.authors.iter() {
        tracing::info!(id = %author.id, name = %author.first_name, "seeded author");
    }

    let app = Router::new()
        .route("/api", get(get_root))
        .route("/api/authors", get(get_authors))
        .route("/api/authors/{author_id}", get(get_author))
        .route("/api/authorcollections/{ids}", get(get_author_collection))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
