//! Static dashboard preview revealed after a run completes.

use serde::Serialize;

use crate::context::ProjectConfig;

/// Address shown in the mock browser chrome.
pub const PREVIEW_URL: &str = "localhost:3000/dashboard";

/// Label of the action that resets the wizard.
pub const RESET_ACTION_LABEL: &str = "Generate Another App";

const NAV_ITEMS: [&str; 4] = ["Overview", "Projects", "AI Tools", "Settings"];

/// A headline statistic card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    /// Caption.
    pub label: &'static str,
    /// Displayed value.
    pub value: &'static str,
    /// Trend badge.
    pub trend: &'static str,
}

/// One row of the recent activity list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityItem {
    /// Row title.
    pub title: String,
    /// Relative time.
    pub when: &'static str,
    /// Status badge.
    pub status: &'static str,
}

/// The plan usage card in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanUsage {
    /// Plan name.
    pub plan: &'static str,
    /// Usage caption.
    pub usage: &'static str,
}

/// View model of the generated application's dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardPreview {
    /// Product name from the submitted configuration.
    pub product_name: String,
    /// Address in the browser chrome.
    pub url: &'static str,
    /// Page title.
    pub title: &'static str,
    /// Primary header action.
    pub primary_action: &'static str,
    /// Sidebar navigation; the first item is selected.
    pub nav: Vec<&'static str>,
    /// Statistic cards.
    pub stats: Vec<StatCard>,
    /// Sidebar plan card.
    pub plan: PlanUsage,
    /// Recent activity rows.
    pub recent_activity: Vec<ActivityItem>,
    /// Label of the reset action.
    pub reset_label: &'static str,
}

impl DashboardPreview {
    /// Builds the preview for a completed project.
    #[must_use]
    pub fn from_config(config: &ProjectConfig) -> Self {
        let stat = |label, value| StatCard {
            label,
            value,
            trend: "+12%",
        };
        Self {
            product_name: config.name.clone(),
            url: PREVIEW_URL,
            title: "Dashboard",
            primary_action: "New Project",
            nav: NAV_ITEMS.to_vec(),
            stats: vec![
                stat("Total Projects", "12"),
                stat("AI Generations", "1,420"),
                stat("Storage Used", "4.2 GB"),
            ],
            plan: PlanUsage {
                plan: "Pro Plan",
                usage: "5,000/10,000 credits used",
            },
            recent_activity: (1..=3)
                .map(|i| ActivityItem {
                    title: format!("Generated Content #{}", 100 + i),
                    when: "2 minutes ago",
                    status: "Completed",
                })
                .collect(),
            reset_label: RESET_ACTION_LABEL,
        }
    }

    /// Returns the selected navigation item.
    #[must_use]
    pub fn selected_nav(&self) -> Option<&'static str> {
        self.nav.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_preview_from_config() {
        let preview = DashboardPreview::from_config(&ProjectConfig::new("CRM").with_name("Acme"));

        assert_eq!(preview.product_name, "Acme");
        assert_eq!(preview.url, "localhost:3000/dashboard");
        assert_eq!(preview.selected_nav(), Some("Overview"));
        assert_eq!(preview.nav, vec!["Overview", "Projects", "AI Tools", "Settings"]);
        assert_eq!(preview.stats[1].value, "1,420");
        assert_eq!(preview.reset_label, "Generate Another App");
    }

    #[test]
    fn test_recent_activity_rows() {
        let preview = DashboardPreview::from_config(&ProjectConfig::default());
        let titles: Vec<&str> = preview
            .recent_activity
            .iter()
            .map(|item| item.title.as_str())
            .collect();

        assert_eq!(
            titles,
            vec![
                "Generated Content #101",
                "Generated Content #102",
                "Generated Content #103"
            ]
        );
    }

    #[test]
    fn test_preview_never_carries_credentials() {
        let config = ProjectConfig::new("CRM").with_clerk_key("pk_live_secret");
        let json = serde_json::to_string(&DashboardPreview::from_config(&config)).unwrap();
        assert!(!json.contains("pk_live_secret"));
    }
}
