//! Operation registry.
//!
//! Built once at startup: maps each operation id to its descriptive record
//! (title, tags, version, input/output fields) and to the code that runs it.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::ExchangeError;
use crate::invocation::{
    ImageOutput, Invocation, InvocationContext, LoadRemoteImage, PostImageToRemote,
};

pub const LOAD_REMOTE_IMAGE: &str = "load_remote_image";
pub const POST_IMAGE_TO_REMOTE: &str = "post_image_to_remote";

/// Value kind of an input or output field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Boolean,
    Integer,
    Image,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub description: &'static str,
    pub required: bool,
}

impl FieldSpec {
    const fn required(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description,
            required: true,
        }
    }

    const fn optional(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description,
            required: false,
        }
    }
}

/// Descriptive record for one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationSpec {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub tags: Vec<&'static str>,
    pub category: &'static str,
    pub version: &'static str,
    pub inputs: Vec<FieldSpec>,
    pub outputs: Vec<FieldSpec>,
}

type RunFn = fn(&str, serde_json::Value, &InvocationContext<'_>) -> Result<ImageOutput, ExchangeError>;

struct Entry {
    spec: OperationSpec,
    run: RunFn,
}

pub struct Registry {
    entries: BTreeMap<&'static str, Entry>,
}

fn run_typed<T>(
    id: &str,
    inputs: serde_json::Value,
    ctx: &InvocationContext<'_>,
) -> Result<ImageOutput, ExchangeError>
where
    T: DeserializeOwned + Invocation,
{
    let invocation: T =
        serde_json::from_value(inputs).map_err(|source| ExchangeError::InvalidInput {
            operation: id.to_string(),
            source,
        })?;
    invocation.invoke(ctx)
}

fn image_output_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::required("image", FieldKind::Image, "The output image"),
        FieldSpec::required("width", FieldKind::Integer, "The width of the image in pixels"),
        FieldSpec::required("height", FieldKind::Integer, "The height of the image in pixels"),
    ]
}

fn node_fields() -> [FieldSpec; 2] {
    [
        FieldSpec::optional("id", FieldKind::String, "Node identifier within the graph"),
        FieldSpec::optional(
            "is_intermediate",
            FieldKind::Boolean,
            "Whether produced images are intermediate",
        ),
    ]
}

impl Registry {
    /// Registry holding the two remote image operations.
    pub fn builtin() -> Self {
        let mut reg = Registry {
            entries: BTreeMap::new(),
        };

        let mut load_inputs = node_fields().to_vec();
        load_inputs.push(FieldSpec::required(
            "image_url",
            FieldKind::String,
            "The URL of the image to get",
        ));
        reg.register(
            OperationSpec {
                id: LOAD_REMOTE_IMAGE,
                title: "Load Remote Image",
                description: "Load an image from a remote URL and provide it as output.",
                tags: vec!["image", "load", "remote", "url"],
                category: "image",
                version: "0.1.0",
                inputs: load_inputs,
                outputs: image_output_fields(),
            },
            run_typed::<LoadRemoteImage>,
        );

        let [id_field, _] = node_fields();
        reg.register(
            OperationSpec {
                id: POST_IMAGE_TO_REMOTE,
                title: "Post Image To Remote",
                description: "Post an image to a remote HTTP endpoint.",
                tags: vec!["image", "post", "remote", "url"],
                category: "image",
                version: "0.1.0",
                inputs: vec![
                    id_field,
                    FieldSpec::required("image", FieldKind::Image, "The image to post"),
                    FieldSpec::required(
                        "endpoint",
                        FieldKind::String,
                        "The endpoint URL to post the image to",
                    ),
                ],
                outputs: image_output_fields(),
            },
            run_typed::<PostImageToRemote>,
        );

        reg
    }

    fn register(&mut self, spec: OperationSpec, run: RunFn) {
        self.entries.insert(spec.id, Entry { spec, run });
    }

    pub fn get(&self, id: &str) -> Option<&OperationSpec> {
        self.entries.get(id).map(|e| &e.spec)
    }

    /// Records in id order.
    pub fn iter(&self) -> impl Iterator<Item = &OperationSpec> {
        self.entries.values().map(|e| &e.spec)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deserialize `inputs` into the operation's input type and run it.
    pub fn invoke(
        &self,
        id: &str,
        inputs: serde_json::Value,
        ctx: &InvocationContext<'_>,
    ) -> Result<ImageOutput, ExchangeError> {
        let entry = self
            .entries
            .get(id)
            .ok_or_else(|| ExchangeError::UnknownOperation(id.to_string()))?;
        tracing::debug!(operation = id, "dispatching invocation");
        (entry.run)(id, inputs, ctx)
    }
}
