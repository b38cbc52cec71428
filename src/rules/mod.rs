pub mod directive;
pub mod matcher;
pub mod resolver;

pub use directive::{Directive, ModeKey, ModeToken, ParsedDirective};
pub use matcher::RuleSet;
pub use resolver::{Resolution, ResolveContext, Tier, resolve};
