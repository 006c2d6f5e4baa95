//! Configuration loading and management
//!
//! One YAML document describes everything the shaping layer needs at
//! startup: paging limits, the media types selecting each variant, route
//! templates, per-resource link templates and the property mappings.

use crate::core::error::{ConfigError, LinkError, MappingError, ProjectionResult};
use crate::links::{LinkTemplate, Negotiator, ResourceLinks, RootLink, RouteTable, Variant};
use crate::mapping::{MappingEntry, PropertyMapping, PropertyMappingRegistry};
use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Page size limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingConfig {
    /// Largest page a client may request; bigger requests are clamped
    #[serde(default = "PagingConfig::default_max_page_size")]
    pub max_page_size: u32,
}

impl PagingConfig {
    /// Page size used when the client does not ask for one
    pub const DEFAULT_PAGE_SIZE: u32 = 10;

    fn default_max_page_size() -> u32 {
        20
    }
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            max_page_size: Self::default_max_page_size(),
        }
    }
}

/// Primary media type tokens per variant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaTypesConfig {
    #[serde(default)]
    pub full: Vec<String>,

    #[serde(default)]
    pub friendly: Vec<String>,

    /// Variant for media types listed nowhere
    #[serde(default)]
    pub default_variant: Variant,
}

/// Property mapping of one (exposed, storage) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingConfig {
    pub exposed: String,
    pub storage: String,

    /// Logical key → storage fields, in declaration order
    pub entries: IndexMap<String, MappingEntry>,
}

/// Complete configuration for the shaping layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Absolute URL every route template is resolved against
    pub base_url: String,

    #[serde(default)]
    pub paging: PagingConfig,

    #[serde(default)]
    pub media_types: MediaTypesConfig,

    /// Route name → path template with `{name}` placeholders
    #[serde(default)]
    pub routes: IndexMap<String, String>,

    /// Exposed resource name → link templates
    #[serde(default)]
    pub resources: IndexMap<String, ResourceLinks>,

    /// Links of the API entry point
    #[serde(default)]
    pub root_links: Vec<RootLink>,

    #[serde(default)]
    pub mappings: Vec<MappingConfig>,
}

impl ProjectionConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Check values serde cannot check
    pub fn validate(&self) -> ProjectionResult<()> {
        if self.paging.max_page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "paging.max_page_size".to_string(),
                value: "0".to_string(),
                message: "must be at least 1".to_string(),
            }
            .into());
        }
        self.route_table()?;
        Ok(())
    }

    /// Freeze the configured mappings into a registry
    ///
    /// Fails on an empty entry, a key declared twice, or an (exposed, storage)
    /// pair registered twice.
    pub fn build_registry(&self) -> Result<PropertyMappingRegistry, MappingError> {
        let mut builder = PropertyMappingRegistry::builder();
        for table in &self.mappings {
            let mapping = PropertyMapping::new(
                table
                    .entries
                    .iter()
                    .map(|(key, entry)| (key.clone(), entry.clone())),
            )?;
            builder.register(table.exposed.clone(), table.storage.clone(), mapping)?;
        }
        Ok(builder.build())
    }

    pub fn route_table(&self) -> ProjectionResult<RouteTable> {
        let mut table = RouteTable::new(&self.base_url)?;
        for (name, template) in &self.routes {
            table.insert(name.clone(), template.clone());
        }
        Ok(table)
    }

    pub fn negotiator(&self) -> Negotiator {
        Negotiator::new()
            .with_full(self.media_types.full.iter().cloned())
            .with_friendly(self.media_types.friendly.iter().cloned())
            .with_default_variant(self.media_types.default_variant)
    }

    /// Link templates of an exposed resource
    pub fn resource_links(&self, resource: &str) -> ProjectionResult<&ResourceLinks> {
        self.resources.get(resource).ok_or_else(|| {
            LinkError::UnknownResource {
                resource: resource.to_string(),
            }
            .into()
        })
    }

    /// Create the course library configuration, used by the demo and tests
    pub fn default_config() -> Self {
        let routes = [
            ("GetRoot", "api"),
            ("GetAuthors", "api/authors"),
            ("GetAuthor", "api/authors/{authorId}"),
            ("CreateAuthor", "api/authors"),
            ("GetCoursesForAuthor", "api/authors/{authorId}/courses"),
            ("GetCourseForAuthor", "api/authors/{authorId}/courses/{courseId}"),
            ("CreateCourseForAuthor", "api/authors/{authorId}/courses"),
            ("GetAuthorCollection", "api/authorcollections/({ids})"),
        ]
        .into_iter()
        .map(|(name, template)| (name.to_string(), template.to_string()))
        .collect();

        let mut resources = IndexMap::new();
        resources.insert(
            "author".to_string(),
            ResourceLinks {
                id_param: "authorId".to_string(),
                self_route: "GetAuthor".to_string(),
                collection_route: "GetAuthors".to_string(),
                category_param: Some("mainCategory".to_string()),
                related: [
                    (
                        "all-author-courses".to_string(),
                        LinkTemplate::new("GetCoursesForAuthor", "GET"),
                    ),
                    (
                        "create-course-for-author".to_string(),
                        LinkTemplate::new("CreateCourseForAuthor", "POST"),
                    ),
                ]
                .into_iter()
                .collect(),
            },
        );
        resources.insert(
            "course".to_string(),
            ResourceLinks::new("courseId", "GetCourseForAuthor", "GetCoursesForAuthor"),
        );

        let root_link = |rel: &str, route: &str, method: &str| RootLink {
            rel: rel.to_string(),
            route: route.to_string(),
            method: method.to_string(),
        };

        let author_entries = [
            ("Id", MappingEntry::new(["Id"], false)),
            ("MainCategory", MappingEntry::new(["MainCategory"], false)),
            ("Age", MappingEntry::new(["DateOfBirth"], true)),
            ("Name", MappingEntry::new(["FirstName", "LastName"], false)),
        ]
        .into_iter()
        .map(|(key, entry)| (key.to_string(), entry))
        .collect();

        let course_entries = [
            ("Id", MappingEntry::new(["Id"], false)),
            ("Title", MappingEntry::new(["Title"], false)),
            ("Description", MappingEntry::new(["Description"], false)),
        ]
        .into_iter()
        .map(|(key, entry)| (key.to_string(), entry))
        .collect();

        Self {
            base_url: "http://localhost:5000".to_string(),
            paging: PagingConfig::default(),
            media_types: MediaTypesConfig {
                full: vec!["vnd.marvin.author.full".to_string()],
                friendly: vec![
                    "vnd.marvin.author.friendly".to_string(),
                    "vnd.marvin".to_string(),
                    "json".to_string(),
                ],
                default_variant: Variant::Friendly,
            },
            routes,
            resources,
            root_links: vec![
                root_link("self", "GetRoot", "GET"),
                root_link("authors", "GetAuthors", "GET"),
                root_link("create_author", "CreateAuthor", "POST"),
            ],
            mappings: vec![
                MappingConfig {
                    exposed: "author".to_string(),
                    storage: "Author".to_string(),
                    entries: author_entries,
                },
                MappingConfig {
                    exposed: "course".to_string(),
                    storage: "Course".to_string(),
                    entries: course_entries,
                },
            ],
        }
    }
}
