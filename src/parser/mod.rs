//
//  mod.rs
//  opncat
//

pub mod actions;
pub mod analyzer;
pub mod patterns;

pub use actions::{extract_actions, parse_parameters, ActionScan};
pub use analyzer::{analyze_controller, controller_name, module_name, ControllerFacts};
pub use patterns::{PatternLibrary, VerbRule, OPNSENSE_VERB_RULES};
