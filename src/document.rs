//! API declaration assembly.
//!
//! One declaration per web service: routes grouped by path into apis, each
//! operation typed by the model compiled from its written sample, and the
//! registry of every model reached. Each declaration owns a private
//! [`Registry`]; [`compose_all`] builds them in parallel.
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify::{classify, Shape};
use crate::config::Config;
use crate::descriptor::TypeDescriptor;
use crate::error::{CompileError, DocumentError};
use crate::model::{Model, Property};
use crate::naming;
use crate::registry::{Diagnostic, Registry};
use crate::service::{Route, WebService};
use crate::walker::compile_descriptor;

// ------------------------------- Types ------------------------------------ //

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDeclaration {
    pub swagger_version: String,
    pub api_version: String,
    pub base_path: String,
    pub resource_path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub apis: Vec<Api>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub models: IndexMap<String, Model>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub produces: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub consumes: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Api {
    pub path: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<Operation>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub method: String,
    pub nickname: String,
    #[serde(flatten)]
    pub data_type: DataTypeRef,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub produces: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub consumes: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub param_type: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(flatten)]
    pub data_type: DataTypeRef,
    pub required: bool,
}

/// `type` plus, for arrays, `items`. `type` is a scalar name, `array`,
/// `void`, or a model id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTypeRef {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Property>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceListing {
    pub api_version: String,
    pub swagger_version: String,
    pub apis: Vec<ResourceRef>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub path: String,
    pub description: String,
}

/// A declaration plus whatever the compiler resolved locally on the way.
#[derive(Clone, Debug)]
pub struct Composed {
    pub declaration: ApiDeclaration,
    pub diagnostics: Vec<Diagnostic>,
}

// ------------------------------ Assembly ---------------------------------- //

pub fn compose_declaration(ws: &WebService, config: &Config) -> Result<Composed, DocumentError> {
    let mut registry = Registry::new();
    let mut by_path: IndexMap<&str, Vec<Operation>> = IndexMap::new();

    for route in ws.routes() {
        let operation =
            compose_operation(route, &mut registry).map_err(|source| DocumentError::Route {
                method: route.method.clone(),
                path: route.path.clone(),
                source,
            })?;
        by_path.entry(route.path.as_str()).or_default().push(operation);
    }

    debug!(resource = ws.root_path(), models = registry.len(), "composed declaration");
    let diagnostics = registry.diagnostics().to_vec();
    let declaration = ApiDeclaration {
        swagger_version: config.swagger_version.clone(),
        api_version: config.api_version.clone(),
        base_path: config.web_services_url.clone(),
        resource_path: ws.root_path().to_string(),
        apis: by_path
            .into_iter()
            .map(|(path, operations)| Api {
                path: path.to_string(),
                description: ws.documentation().to_string(),
                operations,
            })
            .collect(),
        models: registry.into_models(),
        produces: ws.produced().to_vec(),
        consumes: ws.consumed().to_vec(),
    };
    Ok(Composed { declaration, diagnostics })
}

/// One declaration per service, built concurrently, in input order.
pub fn compose_all(
    services: &[WebService],
    config: &Config,
) -> Result<Vec<Composed>, DocumentError> {
    services.par_iter().map(|ws| compose_declaration(ws, config)).collect()
}

pub fn resource_listing(services: &[WebService], config: &Config) -> ResourceListing {
    ResourceListing {
        api_version: config.api_version.clone(),
        swagger_version: config.swagger_version.clone(),
        apis: services
            .iter()
            .map(|ws| ResourceRef {
                path: format!("{}{}", config.api_path.trim_end_matches('/'), ws.root_path()),
                description: ws.documentation().to_string(),
            })
            .collect(),
    }
}

fn compose_operation(route: &Route, registry: &mut Registry) -> Result<Operation, CompileError> {
    let data_type = match &route.writes {
        Some(desc) => data_type_of(desc, registry)?,
        None => DataTypeRef { type_name: "void".to_string(), items: None },
    };

    let mut parameters: Vec<Parameter> = route
        .path_parameters()
        .into_iter()
        .map(|name| Parameter {
            param_type: "path".to_string(),
            name: name.to_string(),
            description: String::new(),
            data_type: DataTypeRef { type_name: "string".to_string(), items: None },
            required: true,
        })
        .collect();
    if let Some(desc) = &route.reads {
        parameters.push(Parameter {
            param_type: "body".to_string(),
            name: "body".to_string(),
            description: String::new(),
            data_type: data_type_of(desc, registry)?,
            required: true,
        });
    }

    Ok(Operation {
        method: route.method.clone(),
        nickname: route.nickname.clone(),
        data_type,
        summary: route.doc.clone(),
        parameters,
        produces: route.produces.clone(),
        consumes: route.consumes.clone(),
    })
}

fn data_type_of(
    desc: &TypeDescriptor,
    registry: &mut Registry,
) -> Result<DataTypeRef, CompileError> {
    let (type_name, items) = match classify(desc) {
        Shape::Primitive(scalar) => (scalar.as_str().to_string(), None),
        Shape::Composite(_) => (compile_descriptor(desc, registry, true)?, None),
        Shape::Array(element) => {
            let items = match classify(&element) {
                Shape::Primitive(scalar) => Property::primitive(scalar),
                Shape::Composite(_) => {
                    Property::reference(compile_descriptor(&element, registry, false)?)
                }
                Shape::Array(_) => {
                    return Err(CompileError::NotComposite { rendered: naming::render_type(desc) });
                }
                Shape::Unsupported(kind) => return Err(CompileError::Unsupported(kind)),
            };
            ("array".to_string(), Some(items))
        }
        Shape::Unsupported(kind) => return Err(CompileError::Unsupported(kind)),
    };
    Ok(DataTypeRef { type_name, items })
}

impl ApiDeclaration {
    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl ResourceListing {
    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ------------------------------- Tests ------------------------------------ //
