pub mod buffer;
pub mod eligibility;
pub mod lint;
pub mod range;
pub mod resolver;
pub mod schema_validator;
pub mod tokenizer;
pub mod tokens;
pub mod validator;
