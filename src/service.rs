//! Route and web service descriptions.
//!
//! The minimum a document needs from a REST framework: paths, verbs, media
//! types and the sample types a route reads and writes.
//!
//! ```ignore
//! let mut ws = WebService::new();
//! ws.path("/pets").consumes([MIME_JSON]).produces([MIME_JSON]);
//! ws.route(ws.get("/{id}").to("getPet").writes::<Pet>());
//! ```
use crate::descriptor::{Describe, TypeDescriptor};

pub const MIME_JSON: &str = "application/json";
pub const MIME_XML: &str = "application/xml";

#[derive(Clone, Debug, Default)]
pub struct WebService {
    root_path: String,
    doc: String,
    consumes: Vec<String>,
    produces: Vec<String>,
    routes: Vec<Route>,
}

#[derive(Clone, Debug)]
pub struct Route {
    pub method: String,
    /// Root path of the service joined with the route's sub path.
    pub path: String,
    pub nickname: String,
    pub doc: String,
    pub consumes: Vec<String>,
    pub produces: Vec<String>,
    pub reads: Option<TypeDescriptor>,
    pub writes: Option<TypeDescriptor>,
}

#[derive(Clone, Debug)]
pub struct RouteBuilder {
    route: Route,
}

// ------------------------------ WebService -------------------------------- //

impl WebService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(&mut self, root: impl Into<String>) -> &mut Self {
        self.root_path = root.into();
        self
    }

    pub fn doc(&mut self, doc: impl Into<String>) -> &mut Self {
        self.doc = doc.into();
        self
    }

    pub fn consumes<I, S>(&mut self, mimes: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.consumes = mimes.into_iter().map(Into::into).collect();
        self
    }

    pub fn produces<I, S>(&mut self, mimes: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.produces = mimes.into_iter().map(Into::into).collect();
        self
    }

    pub fn route(&mut self, builder: RouteBuilder) -> &mut Self {
        self.routes.push(builder.build());
        self
    }

    /// Start a route; media types default to the service's.
    pub fn method(&self, verb: &str, sub_path: &str) -> RouteBuilder {
        RouteBuilder {
            route: Route {
                method: verb.to_ascii_uppercase(),
                path: join_path(&self.root_path, sub_path),
                nickname: String::new(),
                doc: String::new(),
                consumes: self.consumes.clone(),
                produces: self.produces.clone(),
                reads: None,
                writes: None,
            },
        }
    }

    pub fn get(&self, sub_path: &str) -> RouteBuilder {
        self.method("GET", sub_path)
    }

    pub fn post(&self, sub_path: &str) -> RouteBuilder {
        self.method("POST", sub_path)
    }

    pub fn put(&self, sub_path: &str) -> RouteBuilder {
        self.method("PUT", sub_path)
    }

    pub fn patch(&self, sub_path: &str) -> RouteBuilder {
        self.method("PATCH", sub_path)
    }

    pub fn delete(&self, sub_path: &str) -> RouteBuilder {
        self.method("DELETE", sub_path)
    }

    pub fn root_path(&self) -> &str {
        &self.root_path
    }

    pub fn documentation(&self) -> &str {
        &self.doc
    }

    pub fn consumed(&self) -> &[String] {
        &self.consumes
    }

    pub fn produced(&self) -> &[String] {
        &self.produces
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

// ----------------------------- RouteBuilder ------------------------------- //

impl RouteBuilder {
    /// Operation nickname.
    pub fn to(mut self, nickname: impl Into<String>) -> Self {
        self.route.nickname = nickname.into();
        self
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.route.doc = doc.into();
        self
    }

    pub fn consumes<I, S>(mut self, mimes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.route.consumes = mimes.into_iter().map(Into::into).collect();
        self
    }

    pub fn produces<I, S>(mut self, mimes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.route.produces = mimes.into_iter().map(Into::into).collect();
        self
    }

    pub fn reads<T: Describe + ?Sized>(mut self) -> Self {
        self.route.reads = Some(T::describe());
        self
    }

    pub fn writes<T: Describe + ?Sized>(mut self) -> Self {
        self.route.writes = Some(T::describe());
        self
    }

    /// Like [`reads`](Self::reads), typed by a representative value.
    pub fn reads_sample<T: Describe + ?Sized>(self, _sample: &T) -> Self {
        self.reads::<T>()
    }

    /// Like [`writes`](Self::writes), typed by a representative value.
    pub fn writes_sample<T: Describe + ?Sized>(self, _sample: &T) -> Self {
        self.writes::<T>()
    }

    pub fn build(self) -> Route {
        self.route
    }
}

// -------------------------------- Route ----------------------------------- //

impl Route {
    /// Names of `{param}` segments, in path order.
    pub fn path_parameters(&self) -> Vec<&str> {
        self.path
            .split('/')
            .filter_map(|segment| segment.strip_prefix('{')?.strip_suffix('}'))
            .filter(|name| !name.is_empty())
            .collect()
    }
}

fn join_path(root: &str, sub: &str) -> String {
    let root = root.trim_end_matches('/');
    let sub = sub.trim_start_matches('/');
    match (root.is_empty(), sub.is_empty()) {
        (true, true) => "/".to_string(),
        (true, false) => format!("/{sub}"),
        (false, true) => root.to_string(),
        (false, false) => format!("{root}/{sub}"),
    }
}
