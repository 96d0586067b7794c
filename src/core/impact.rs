//! Downstream impact and complexity classification

use crate::models::analysis::{
    ComplexityAnalysis, HighImpactModule, ImpactAnalysis, ModuleImpact, HIGH_IMPACT_THRESHOLD,
};
use crate::models::dependency_graph::DependencyGraph;

/// Downstream reach of every module
pub fn analyze_impact(graph: &DependencyGraph) -> ImpactAnalysis {
    let mut analysis = ImpactAnalysis::default();

    for id in graph.modules().keys() {
        let affected: Vec<String> = graph.downstream(id).into_iter().collect();
        let impact = ModuleImpact {
            impact_count: affected.len(),
            affected_modules: affected,
        };

        if impact.impact_count > HIGH_IMPACT_THRESHOLD {
            analysis.recommendations.push(format!(
                "Module '{}' has high impact ({} affected modules). Consider breaking it into \
                 smaller modules or publishing its outputs through data sources to reduce coupling.",
                id, impact.impact_count
            ));
            analysis.high_impact_modules.push(HighImpactModule {
                module: id.clone(),
                impact_count: impact.impact_count,
                affected_modules: impact.affected_modules.clone(),
            });
        }

        analysis.module_impact_analysis.insert(id.clone(), impact);
    }

    analysis
}

/// Bucket every module by its complexity score
pub fn classify_complexity(graph: &DependencyGraph) -> ComplexityAnalysis {
    let mut analysis = ComplexityAnalysis::default();
    for (id, module) in graph.modules() {
        analysis.classify(id, module.complexity_score);
    }
    analysis
}
