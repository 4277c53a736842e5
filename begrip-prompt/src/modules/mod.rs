mod core_modules;
mod semantic;
mod guards;
mod validation;
mod closing;

pub use closing::{DefinitionTaskModule, MetricsModule};
pub use core_modules::{ContextAwarenessModule, ExpertiseModule, OutputSpecificationModule};
pub use guards::{ErrorPreventionModule, GrammarModule};
pub use semantic::{SemanticCategorisationModule, TemplateModule};
pub use validation::{LinguisticRulesModule, UnifiedValidationRulesModule, ValidationRulesModule};

use crate::context::PromptModule;
use crate::rules::RULE_FAMILIES;
use std::sync::Arc;

/// Which module set the orchestrator is assembled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleCatalog {
    /// Sixteen modules, one per concern, seven rule-family modules.
    Classic,
    /// Nine modules: the rule families merged into one, the structural and
    /// output modules merged into linguistic rules. Same content.
    Consolidated,
}

pub fn build_catalog(catalog: ModuleCatalog) -> Vec<Arc<dyn PromptModule>> {
    match catalog {
        ModuleCatalog::Classic => classic_catalog(),
        ModuleCatalog::Consolidated => consolidated_catalog(),
    }
}

pub fn classic_catalog() -> Vec<Arc<dyn PromptModule>> {
    let mut modules: Vec<Arc<dyn PromptModule>> = vec![
        Arc::new(ExpertiseModule),
        Arc::new(OutputSpecificationModule),
        Arc::new(ContextAwarenessModule),
        Arc::new(SemanticCategorisationModule),
        Arc::new(TemplateModule),
        Arc::new(GrammarModule),
        Arc::new(ErrorPreventionModule),
    ];
    // One module per rule family; priorities descend in family order so the
    // registration order equals the placement order.
    let mut priority = 60;
    for family in RULE_FAMILIES {
        modules.push(Arc::new(ValidationRulesModule::new(family, priority)));
        priority -= 2;
    }
    modules.push(Arc::new(DefinitionTaskModule));
    modules.push(Arc::new(MetricsModule));
    modules
}

pub fn consolidated_catalog() -> Vec<Arc<dyn PromptModule>> {
    vec![
        Arc::new(ExpertiseModule),
        Arc::new(ContextAwarenessModule),
        Arc::new(SemanticCategorisationModule),
        Arc::new(TemplateModule),
        Arc::new(LinguisticRulesModule),
        Arc::new(ErrorPreventionModule),
        Arc::new(UnifiedValidationRulesModule),
        Arc::new(DefinitionTaskModule),
        Arc::new(MetricsModule),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_catalog_has_sixteen_modules() {
        assert_eq!(classic_catalog().len(), 16);
    }

    #[test]
    fn test_consolidated_catalog_has_nine_modules() {
        assert_eq!(consolidated_catalog().len(), 9);
    }

    #[test]
    fn test_module_ids_unique() {
        for catalog in [ModuleCatalog::Classic, ModuleCatalog::Consolidated] {
            let modules = build_catalog(catalog);
            let mut ids = std::collections::HashSet::new();
            for module in &modules {
                assert!(ids.insert(module.id().to_string()), "dubbel id: {}", module.id());
            }
        }
    }
}
