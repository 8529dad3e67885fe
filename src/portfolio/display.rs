use colored::Colorize;

use super::types::PortfolioSnapshot;

const WIDTH: usize = 80;

/// Portfolio formatter for console output
#[derive(Debug, Clone)]
pub struct PortfolioDisplay {
    show_colors: bool,
    compact_mode: bool,
}

impl Default for PortfolioDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl PortfolioDisplay {
    pub fn new() -> Self {
        Self {
            show_colors: true,
            compact_mode: false,
        }
    }

    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.show_colors = enabled;
        self
    }

    /// One line per token, no per-chain section
    pub fn compact(mut self) -> Self {
        self.compact_mode = true;
        self
    }

    pub fn print(&self, snapshot: &PortfolioSnapshot) {
        println!("{}", self.render(snapshot));
    }

    pub fn render(&self, snapshot: &PortfolioSnapshot) -> String {
        let mut lines = Vec::new();

        lines.push(self.header("PORTFOLIO"));
        lines.push(format!(
            "Total value: {}   Tokens: {}   Generated: {}",
            self.paint_value(snapshot.total_usd_value),
            snapshot.token_count,
            snapshot.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        if snapshot.is_empty() {
            lines.push(String::new());
            lines.push("No tokens with a positive balance".to_string());
        } else if self.compact_mode {
            for entry in &snapshot.entries {
                lines.push(format!(
                    "{} {} {} (${:.2})",
                    entry.token.network,
                    entry.formatted_balance,
                    entry.token.symbol,
                    entry.value_usd
                ));
            }
        } else {
            lines.push(String::new());
            lines.push(format!(
                "{:<10} {:<10} {:>22} {:>12} {:>14} {:<14}",
                "Network", "Token", "Balance", "Price", "Value (USD)", "Source"
            ));
            lines.push("─".repeat(WIDTH));
            for entry in &snapshot.entries {
                lines.push(format!(
                    "{:<10} {:<10} {:>22} {:>12} {:>14} {:<14}",
                    entry.token.network.as_str(),
                    truncate(&entry.token.symbol, 10),
                    truncate(&entry.formatted_balance, 22),
                    format!("{:.4}", entry.price_usd),
                    format!("{:.2}", entry.value_usd),
                    entry.token.discovery_method.as_str()
                ));
            }

            lines.push(String::new());
            lines.push(self.header("BY NETWORK"));
            for total in &snapshot.chain_totals {
                lines.push(format!(
                    "{:<10} {:>3} tokens  {}",
                    total.network.as_str(),
                    total.token_count,
                    self.paint_value(total.usd_value)
                ));
            }
        }

        lines.push("═".repeat(WIDTH));
        lines.join("\n")
    }

    fn header(&self, title: &str) -> String {
        let line = format!("══ {} {}", title, "═".repeat(WIDTH.saturating_sub(title.len() + 4)));
        if self.show_colors {
            line.bold().cyan().to_string()
        } else {
            line
        }
    }

    fn paint_value(&self, value: f64) -> String {
        let text = format!("${:.2}", value);
        if !self.show_colors {
            text
        } else if value > 0.0 {
            text.green().bold().to_string()
        } else {
            text.dimmed().to_string()
        }
    }
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let kept: String = value.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}
