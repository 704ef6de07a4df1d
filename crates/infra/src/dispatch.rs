//! Resource method dispatch.
//!
//! A [`ResourceDispatcher`] runs one invocation through the request pipeline:
//! decode the request entity, validate parameters and entity, invoke the
//! handler, validate the result, encode it. Any failure along the way is
//! turned into a response by the mapper registry.

use faultline_api::v1::{HttpResponse, ResponseBody};
use faultline_app::{ConfiguredValidator, MapperRegistry};
use faultline_domain::{
    EntityValue, HttpStatus, JsonFailure, JsonFailureKind, MethodDescriptor, PipelineError,
};
use faultline_ports::{JsonCodecPort, LogFields, LoggerPort};
use faultline_shared::RequestId;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Converts a raw request body into the entity value.
pub type BodyReader = dyn Fn(&[u8]) -> Result<EntityValue, JsonFailure> + Send + Sync;

/// Resource method body.
pub type Handler = dyn Fn(&[EntityValue]) -> Result<Option<Outbound>, PipelineError> + Send + Sync;

/// Body reader decoding `T` with `codec`; the entity carries `type_name`.
///
/// A decoded value that cannot be turned back into a JSON tree is a mapping
/// failure at the root, which maps to a server error.
pub fn typed_body<T, C>(
    codec: C,
    type_name: impl Into<String>,
) -> impl Fn(&[u8]) -> Result<EntityValue, JsonFailure> + Send + Sync
where
    T: DeserializeOwned + Serialize,
    C: JsonCodecPort + 'static,
{
    let type_name = type_name.into();
    move |body| {
        let value: T = codec.decode(body)?;
        let document = serde_json::to_value(&value)
            .map_err(|error| JsonFailure::new(JsonFailureKind::Mapping, error.to_string()))?;
        Ok(EntityValue::bean_from_json(type_name.as_str(), document))
    }
}

/// A value returned by a handler.
#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    /// Value checked by return-value validation.
    pub value: EntityValue,
    /// Encoded response body, or the failure raised while encoding it.
    pub encoded: Result<Value, JsonFailure>,
}

impl Outbound {
    /// Pair a value with an already encoded body.
    #[must_use]
    pub const fn new(value: EntityValue, encoded: Result<Value, JsonFailure>) -> Self {
        Self { value, encoded }
    }

    /// Return an entity value as-is.
    #[must_use]
    pub fn entity(value: EntityValue) -> Self {
        let encoded = Ok(value.to_json());
        Self { value, encoded }
    }

    /// Validate `value` and encode `body` with `codec`.
    ///
    /// An encoding failure only affects `encoded`; return-value validation
    /// still sees `value`.
    pub fn serialize<T, C>(codec: &C, value: EntityValue, body: &T) -> Self
    where
        T: Serialize + ?Sized,
        C: JsonCodecPort + ?Sized,
    {
        let encoded = codec.encode(body);
        Self { value, encoded }
    }
}

/// A resource method: descriptor, optional body reader, and handler.
pub struct ResourceMethod {
    descriptor: MethodDescriptor,
    body_reader: Option<Box<BodyReader>>,
    handler: Box<Handler>,
}

impl ResourceMethod {
    /// Bind a handler to a descriptor.
    pub fn new<H>(descriptor: MethodDescriptor, handler: H) -> Self
    where
        H: Fn(&[EntityValue]) -> Result<Option<Outbound>, PipelineError> + Send + Sync + 'static,
    {
        Self {
            descriptor,
            body_reader: None,
            handler: Box::new(handler),
        }
    }

    /// Decode request bodies with `reader`.
    #[must_use]
    pub fn with_body_reader<R>(mut self, reader: R) -> Self
    where
        R: Fn(&[u8]) -> Result<EntityValue, JsonFailure> + Send + Sync + 'static,
    {
        self.body_reader = Some(Box::new(reader));
        self
    }

    /// The method descriptor.
    #[must_use]
    pub const fn descriptor(&self) -> &MethodDescriptor {
        &self.descriptor
    }
}

impl std::fmt::Debug for ResourceMethod {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ResourceMethod")
            .field("descriptor", &self.descriptor)
            .field("reads_body", &self.body_reader.is_some())
            .finish_non_exhaustive()
    }
}

/// One invocation of a resource method.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InboundRequest {
    /// Correlation id; generated when absent.
    pub request_id: Option<RequestId>,
    /// Bound arguments in parameter order; the entity slot is filled from the body.
    pub arguments: Vec<EntityValue>,
    /// Raw request body.
    pub body: Option<Vec<u8>>,
}

impl InboundRequest {
    /// A request with no arguments and no body.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a bound argument.
    #[must_use]
    pub fn with_argument(mut self, value: impl Into<EntityValue>) -> Self {
        self.arguments.push(value.into());
        self
    }

    /// Set the raw body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the correlation id.
    #[must_use]
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }
}

/// Runs resource methods and maps their failures.
#[derive(Clone)]
pub struct ResourceDispatcher {
    validator: ConfiguredValidator,
    registry: MapperRegistry,
    logger: Arc<dyn LoggerPort>,
}

impl ResourceDispatcher {
    /// Combine a validator and a mapper registry; dispatch events go to `logger`.
    #[must_use]
    pub fn new(
        validator: ConfiguredValidator,
        registry: MapperRegistry,
        logger: Arc<dyn LoggerPort>,
    ) -> Self {
        Self {
            validator,
            registry,
            logger,
        }
    }

    /// The mapper registry.
    #[must_use]
    pub const fn registry(&self) -> &MapperRegistry {
        &self.registry
    }

    /// Invoke `method` for `request` and produce the response.
    #[tracing::instrument(
        skip_all,
        fields(resource = %method.descriptor.resource, method = %method.descriptor.name)
    )]
    pub fn dispatch(&self, method: &ResourceMethod, request: InboundRequest) -> HttpResponse {
        let request_id = request.request_id.clone().unwrap_or_else(RequestId::next);
        let logger = self.request_logger(&request_id, &method.descriptor);

        logger.debug("dispatch.start", "Dispatching resource method", None);

        let response = match self.run(method, request) {
            Ok(response) => response,
            Err(error) => {
                let mut fields = LogFields::new();
                fields.insert("kind".into(), Value::from(error.kind().as_str()));
                logger.debug("dispatch.failed", &error.to_string(), Some(fields));
                self.registry.map(&error)
            },
        };

        let mut fields = LogFields::new();
        fields.insert("status".into(), Value::from(response.status.as_u16()));
        logger.debug("dispatch.completed", "Resource method completed", Some(fields));
        response
    }

    fn run(
        &self,
        method: &ResourceMethod,
        request: InboundRequest,
    ) -> Result<HttpResponse, PipelineError> {
        let descriptor = &method.descriptor;
        let mut arguments = request.arguments;
        if arguments.len() < descriptor.parameters.len() {
            arguments.resize(descriptor.parameters.len(), EntityValue::Null);
        }

        if let Some(index) = descriptor.entity_index() {
            let entity = match (request.body.as_deref(), method.body_reader.as_deref()) {
                (Some(body), Some(reader)) if !body.is_empty() => reader(body)?,
                _ => EntityValue::Null,
            };
            if let Some(slot) = arguments.get_mut(index) {
                *slot = entity;
            }
        }

        self.validator
            .validate_resource_and_input_params(descriptor, &arguments)?;

        let outbound = (method.handler)(&arguments)?.ok_or(PipelineError::EmptyOptional)?;

        self.validator.validate_result(descriptor, &outbound.value)?;

        let document = outbound.encoded?;
        Ok(HttpResponse::json(HttpStatus::OK, ResponseBody::Json(document)))
    }

    fn request_logger(
        &self,
        request_id: &RequestId,
        descriptor: &MethodDescriptor,
    ) -> Box<dyn LoggerPort> {
        let mut fields = LogFields::new();
        fields.insert("requestId".into(), Value::from(request_id.as_str()));
        fields.insert("resource".into(), Value::from(descriptor.resource.as_str()));
        fields.insert("method".into(), Value::from(descriptor.name.as_str()));
        self.logger.child(fields)
    }
}

impl std::fmt::Debug for ResourceDispatcher {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ResourceDispatcher")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
