//! The built-in modifier catalogue.
//!
//! Configuration resolves a modifier by its stable `type` discriminator;
//! the closed set of variants lives behind the `AnyModifier` enum, which
//! delegates the `Modifier` contract to the selected rule.

pub mod config_to_model_config;
pub mod field_validator_check;
pub mod forbidden_functions;
pub mod len_as_bool;
pub mod local_imports;
pub mod object_to_any;
pub mod pydantic_v1_to_v2;
pub mod str_enum_inheritance;
pub mod typing_to_builtin;
pub mod utcnow_to_datetime_now;
pub mod workflow_env_to_example;

use serde::{Deserialize, Serialize};

use recast_core::SourceFile;

use crate::error::{ConfigError, EngineError};
use crate::modifier::Modifier;

pub use config_to_model_config::PydanticConfigToModelConfig;
pub use field_validator_check::FieldValidatorCheck;
pub use forbidden_functions::ForbiddenFunctions;
pub use len_as_bool::LenAsBool;
pub use local_imports::LocalImports;
pub use object_to_any::ObjectToAny;
pub use pydantic_v1_to_v2::PydanticV1ToV2;
pub use str_enum_inheritance::StrEnumInheritance;
pub use typing_to_builtin::TypingToBuiltin;
pub use utcnow_to_datetime_now::UtcNowToDatetimeNow;
pub use workflow_env_to_example::WorkflowEnvToExample;

/// Closed set of configurable modifiers, keyed by the `type` discriminator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AnyModifier {
    #[serde(rename = "object-to-any")]
    ObjectToAny(ObjectToAny),

    #[serde(rename = "typing-to-builtin")]
    TypingToBuiltin(TypingToBuiltin),

    #[serde(rename = "len-as-bool")]
    LenAsBool(LenAsBool),

    #[serde(rename = "pydantic-v1-to-v2")]
    PydanticV1ToV2(PydanticV1ToV2),

    #[serde(rename = "pydantic-config-to-model-config")]
    PydanticConfigToModelConfig(PydanticConfigToModelConfig),

    #[serde(rename = "str-enum-inheritance")]
    StrEnumInheritance(StrEnumInheritance),

    #[serde(rename = "utcnow-to-datetime-now")]
    UtcNowToDatetimeNow(UtcNowToDatetimeNow),

    #[serde(rename = "forbidden-functions")]
    ForbiddenFunctions(ForbiddenFunctions),

    #[serde(rename = "local-imports")]
    LocalImports(LocalImports),

    #[serde(rename = "field-validator-check")]
    FieldValidatorCheck(FieldValidatorCheck),

    #[serde(rename = "workflow-env-to-example")]
    WorkflowEnvToExample(WorkflowEnvToExample),
}

impl AnyModifier {
    fn as_modifier(&self) -> &dyn Modifier {
        match self {
            AnyModifier::ObjectToAny(modifier) => modifier,
            AnyModifier::TypingToBuiltin(modifier) => modifier,
            AnyModifier::LenAsBool(modifier) => modifier,
            AnyModifier::PydanticV1ToV2(modifier) => modifier,
            AnyModifier::PydanticConfigToModelConfig(modifier) => modifier,
            AnyModifier::StrEnumInheritance(modifier) => modifier,
            AnyModifier::UtcNowToDatetimeNow(modifier) => modifier,
            AnyModifier::ForbiddenFunctions(modifier) => modifier,
            AnyModifier::LocalImports(modifier) => modifier,
            AnyModifier::FieldValidatorCheck(modifier) => modifier,
            AnyModifier::WorkflowEnvToExample(modifier) => modifier,
        }
    }
}

impl Modifier for AnyModifier {
    fn validate(&self) -> Result<(), ConfigError> {
        self.as_modifier().validate()
    }

    fn modify(&self, files: &[SourceFile]) -> Result<bool, EngineError> {
        self.as_modifier().modify(files)
    }
}
