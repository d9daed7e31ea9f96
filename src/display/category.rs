//! Category, rule, and goal display formatting

use crate::models::{AutomationRule, Category, CategoryId, FlowKind, Goal};

/// Format the category tree, expense categories first, children indented
/// under their parents
pub fn format_category_tree(categories: &[Category]) -> String {
    let mut output = String::new();

    for kind in [FlowKind::Expense, FlowKind::Income] {
        let heading = match kind {
            FlowKind::Expense => "Expense categories",
            FlowKind::Income => "Income categories",
        };
        output.push_str(heading);
        output.push('\n');

        let mut roots: Vec<&Category> = categories
            .iter()
            .filter(|c| c.kind == kind && c.parent_id.is_none())
            .collect();
        roots.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

        // Depth-first with an explicit stack; children pushed in reverse
        // so siblings print in name order
        let mut stack: Vec<(&Category, usize)> =
            roots.into_iter().rev().map(|c| (c, 1)).collect();
        while let Some((node, depth)) = stack.pop() {
            let marker = if node.is_sink() { " (reserved)" } else { "" };
            output.push_str(&format!(
                "{}{}{} [{}]\n",
                "  ".repeat(depth),
                node.name,
                marker,
                node.id
            ));

            let mut children: Vec<&Category> = categories
                .iter()
                .filter(|c| c.parent_id == Some(node.id))
                .collect();
            children.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
            for child in children.into_iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        output.push('\n');
    }

    output
}

/// Format the rule list
pub fn format_rule_list<F>(rules: &[AutomationRule], category_name: F) -> String
where
    F: Fn(CategoryId) -> String,
{
    if rules.is_empty() {
        return "No automation rules defined.\n".to_string();
    }

    let mut output = String::new();
    for rule in rules {
        output.push_str(&format!(
            "\"{}\" ({}) -> {} [{}]\n",
            rule.keyword,
            rule.kind,
            category_name(rule.category_id),
            rule.id
        ));
    }
    output
}

/// Format the goal list
pub fn format_goal_list<F>(goals: &[Goal], category_name: F, symbol: &str) -> String
where
    F: Fn(CategoryId) -> String,
{
    if goals.is_empty() {
        return "No goals defined.\n".to_string();
    }

    let mut output = String::new();
    for goal in goals {
        output.push_str(&format!(
            "{}: {} ({}) [{}]\n",
            goal.name,
            goal.target.format_with_symbol(symbol),
            category_name(goal.category_id),
            goal.id
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_categories;

    #[test]
    fn test_tree_shows_both_kinds_and_marks_sinks() {
        let output = format_category_tree(&default_categories());
        assert!(output.contains("Expense categories"));
        assert!(output.contains("Income categories"));
        assert!(output.contains("Uncategorized (reserved)"));
        assert!(output.contains("Various Income (reserved)"));
    }

    #[test]
    fn test_tree_indents_children() {
        let mut categories = default_categories();
        let parent_id = categories
            .iter()
            .find(|c| c.name == "Groceries")
            .unwrap()
            .id;
        categories.push(Category::with_parent("Produce", FlowKind::Expense, parent_id));

        let output = format_category_tree(&categories);
        assert!(output.contains("    Produce"));
    }

    #[test]
    fn test_empty_rule_list() {
        let output = format_rule_list(&[], |_| String::new());
        assert!(output.contains("No automation rules"));
    }
}
