// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! JSON-API documents exchanged with App Store Connect.
//!
//! Responses wrap one ([Document]) or many ([Documents]) [Resource] objects
//! whose attributes are endpoint specific. Requests wrap a single
//! [RequestData] in a [Request].

use {
    serde::{Deserialize, Serialize},
    serde_json::Value as JsonValue,
    url::Url,
};

/// A reference to a resource by type and ID.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ResourceLinkage {
    pub id: String,
    pub r#type: String,
}

impl ResourceLinkage {
    pub fn new(r#type: impl ToString, id: impl ToString) -> Self {
        Self {
            id: id.to_string(),
            r#type: r#type.to_string(),
        }
    }
}

/// A to-one relationship in a request.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Relationship {
    pub data: ResourceLinkage,
}

impl Relationship {
    pub fn new(r#type: impl ToString, id: impl ToString) -> Self {
        Self {
            data: ResourceLinkage::new(r#type, id),
        }
    }
}

/// A to-many relationship in a request.
///
/// Also the body of relationship endpoints (`/relationships/...`).
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Relationships {
    pub data: Vec<ResourceLinkage>,
}

impl Relationships {
    pub fn new<I, S>(r#type: &str, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        Self {
            data: ids
                .into_iter()
                .map(|id| ResourceLinkage::new(r#type, id))
                .collect(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ResourceLinks {
    #[serde(rename = "self")]
    pub self_link: Url,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct DocumentLinks {
    #[serde(rename = "self")]
    pub self_link: Url,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PagedDocumentLinks {
    #[serde(rename = "self")]
    pub self_link: Url,
    #[serde(default)]
    pub first: Option<Url>,
    #[serde(default)]
    pub next: Option<Url>,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Paging {
    pub total: u64,
    pub limit: u64,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PagingInformation {
    pub paging: Paging,
}

/// A resource object.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Resource<A> {
    pub id: String,
    pub r#type: String,
    pub attributes: Option<A>,
    /// Relationship objects, left untyped.
    #[serde(default)]
    pub relationships: Option<JsonValue>,
    #[serde(default)]
    pub links: Option<ResourceLinks>,
}

impl<A> Resource<A> {
    pub fn linkage(&self) -> ResourceLinkage {
        ResourceLinkage::new(&self.r#type, &self.id)
    }
}

/// A document holding a single resource.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Document<A> {
    pub data: Resource<A>,
    /// Resources requested with `include`.
    #[serde(default)]
    pub included: Vec<JsonValue>,
    #[serde(default)]
    pub links: Option<DocumentLinks>,
}

/// A document holding a page of resources.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Documents<A> {
    pub data: Vec<Resource<A>>,
    #[serde(default)]
    pub included: Vec<JsonValue>,
    #[serde(default)]
    pub links: Option<PagedDocumentLinks>,
    #[serde(default)]
    pub meta: Option<PagingInformation>,
}

impl<A> Documents<A> {
    /// URL of the next page, if there is one.
    pub fn next_page(&self) -> Option<&Url> {
        self.links.as_ref().and_then(|l| l.next.as_ref())
    }
}

/// Response of a to-one relationship endpoint.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct LinkageDocument {
    pub data: ResourceLinkage,
    #[serde(default)]
    pub links: Option<DocumentLinks>,
}

/// Response of a to-many relationship endpoint.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct LinkagesDocument {
    pub data: Vec<ResourceLinkage>,
    #[serde(default)]
    pub links: Option<PagedDocumentLinks>,
    #[serde(default)]
    pub meta: Option<PagingInformation>,
}

/// Primary data of a create or update request.
#[derive(Clone, Debug, Serialize)]
pub struct RequestData<A, R> {
    pub r#type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<A>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationships: Option<R>,
}

/// A create or update request body.
#[derive(Clone, Debug, Serialize)]
pub struct Request<A, R = ()> {
    pub data: RequestData<A, R>,
}

impl<A, R> Request<A, R> {
    /// A request creating a resource of the given type.
    pub fn create(r#type: impl ToString, attributes: A) -> Self {
        Self {
            data: RequestData {
                r#type: r#type.to_string(),
                id: None,
                attributes: Some(attributes),
                relationships: None,
            },
        }
    }

    /// A request modifying the attributes of an existing resource.
    pub fn update(r#type: impl ToString, id: impl ToString, attributes: A) -> Self {
        Self {
            data: RequestData {
                r#type: r#type.to_string(),
                id: Some(id.to_string()),
                attributes: Some(attributes),
                relationships: None,
            },
        }
    }

    pub fn with_relationships(mut self, relationships: R) -> Self {
        self.data.relationships = Some(relationships);
        self
    }
}

impl<R> Request<(), R> {
    /// A create request carrying only relationships.
    pub fn link(r#type: impl ToString, relationships: R) -> Self {
        Self {
            data: RequestData {
                r#type: r#type.to_string(),
                id: None,
                attributes: None,
                relationships: Some(relationships),
            },
        }
    }
}
