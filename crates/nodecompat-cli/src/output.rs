use console::style;
use nodecompat_manifest::{summary_message, Analysis};
use nodecompat_semver::AggregationStep;

/// Human-readable rendering of an analysis
pub fn render(analysis: &Analysis, verbose: bool) -> String {
    let result = analysis.result();
    let mut lines = Vec::new();

    if verbose {
        for step in result.steps() {
            lines.push(render_step(step));
        }
    }

    for skipped in &analysis.skipped {
        lines.push(format!(
            "{} Skipped {}: {}",
            style("Warning:").yellow(),
            style(&skipped.name).cyan(),
            skipped.reason
        ));
    }

    let message = summary_message(result);
    let summary = if result.is_conflict() {
        format!("{} {}", style("Error:").red().bold(), message)
    } else if result.interval().is_unbounded() {
        format!("{} {}", style("Warning:").yellow(), message)
    } else {
        format!("{} {}", style("Success:").green().bold(), message)
    };
    lines.push(summary);

    if verbose {
        lines.push(format!(
            "{} {} dependencies analyzed",
            style("Info:").cyan(),
            analysis.dependencies.saturating_sub(analysis.skipped.len())
        ));
    }

    lines.join("\n")
}

fn render_step(step: &AggregationStep) -> String {
    let expression = match &step.expression {
        Some(expression) => expression.as_str(),
        None => "(none)",
    };
    let mut line = format!(
        "{} {} engines.node {} => {}",
        style(">").green(),
        style(&step.participant).cyan(),
        expression,
        style(&step.interval).dim()
    );
    if !step.well_formed {
        line.push_str(&format!(" {}", style("(malformed, ignored)").yellow()));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodecompat_manifest::SkippedDependency;
    use nodecompat_semver::{AggregationMode, Aggregator};

    fn analysis(participants: &[(&str, Option<&str>)], skipped: Vec<SkippedDependency>) -> Analysis {
        let mut aggregator = Aggregator::new(AggregationMode::Collapsed);
        for (name, expression) in participants {
            aggregator.add(name, *expression);
        }
        Analysis {
            project_name: Some("app".to_string()),
            result: aggregator.finish(),
            dependencies: participants.len() - 1 + skipped.len(),
            skipped,
        }
    }

    #[test]
    fn test_render_success() {
        console::set_colors_enabled(false);
        let output = render(&analysis(&[("Project root", Some(">=14.0.0")), ("a", Some("<16"))], vec![]), false);
        assert_eq!(output, "Success: Determined Node.js version range: >=14.0.0 <16.0.0");
    }

    #[test]
    fn test_render_conflict() {
        console::set_colors_enabled(false);
        let output = render(&analysis(&[("Project root", Some(">=18")), ("a", Some("<16"))], vec![]), false);
        assert!(output.starts_with("Error: Version conflict"));
    }

    #[test]
    fn test_render_no_constraints() {
        console::set_colors_enabled(false);
        let output = render(&analysis(&[("Project root", None)], vec![]), false);
        assert_eq!(output, "Warning: No specific Node.js engine constraints found.");
    }

    #[test]
    fn test_render_verbose_lists_participants() {
        console::set_colors_enabled(false);
        let skipped = vec![SkippedDependency {
            name: "ghost".to_string(),
            reason: "not installed".to_string(),
        }];
        let output = render(
            &analysis(&[("Project root", None), ("a", Some(">=14")), ("b", Some("garbage"))], skipped),
            true,
        );
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "> Project root engines.node (none) => *");
        assert_eq!(lines[1], "> a engines.node >=14 => >=14.0.0");
        assert_eq!(lines[2], "> b engines.node garbage => * (malformed, ignored)");
        assert_eq!(lines[3], "Warning: Skipped ghost: not installed");
        assert_eq!(lines[4], "Success: Determined minimum Node.js version: 14.0.0");
        assert_eq!(lines[5], "Info: 2 dependencies analyzed");
    }
}
