use crate::leaderboard::entry::LeaderboardEntry;
use crate::leaderboard::ranker::{Category, Leaderboard};
use crate::util::dates;

/// Column-aligned text table for terminal output.
#[derive(Debug, Default)]
pub struct TextTable {
    title: String,
    headers: Vec<String>,
    columns: Vec<Vec<String>>,
}

impl TextTable {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            headers: Vec::new(),
            columns: Vec::new(),
        }
    }

    pub fn add_column(mut self, header: &str, values: Vec<String>) -> Self {
        self.headers.push(header.to_string());
        self.columns.push(values);
        self
    }

    pub fn build(self) -> String {
        let widths: Vec<usize> = self
            .headers
            .iter()
            .zip(&self.columns)
            .map(|(header, values)| {
                values
                    .iter()
                    .map(String::len)
                    .chain(std::iter::once(header.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        out.push_str(&self.title);
        out.push('\n');

        let header_row: Vec<String> = self
            .headers
            .iter()
            .zip(&widths)
            .map(|(h, &w)| format!("{h:<w$}"))
            .collect();
        out.push_str(header_row.join("  ").trim_end());
        out.push('\n');

        let rows = self.columns.iter().map(Vec::len).max().unwrap_or(0);
        for row in 0..rows {
            let cells: Vec<String> = self
                .columns
                .iter()
                .zip(&widths)
                .map(|(values, &w)| {
                    let cell = values.get(row).map(String::as_str).unwrap_or("");
                    format!("{cell:<w$}")
                })
                .collect();
            out.push_str(cells.join("  ").trim_end());
            out.push('\n');
        }
        out
    }
}

pub fn render_board(board: &Leaderboard) -> String {
    let sections: Vec<String> = Category::ALL
        .into_iter()
        .filter_map(|category| render_category(board, category))
        .collect();

    if sections.is_empty() {
        return "No results recorded yet.\n".to_string();
    }
    sections.join("\n")
}

fn render_category(board: &Leaderboard, category: Category) -> Option<String> {
    let entries = board.view(category);
    let leader = entries.first()?;

    let title = format!(
        "{} - leader: {} ({})",
        category.label(),
        leader.player_name,
        metric_value(category, leader)
    );

    let table = TextTable::new(title)
        .add_column(
            "Rank",
            (1..=entries.len()).map(|r| r.to_string()).collect(),
        )
        .add_column(
            "Player",
            entries.iter().map(|e| e.player_name.clone()).collect(),
        )
        .add_column(
            "Case",
            entries.iter().map(|e| e.case_name.clone()).collect(),
        )
        .add_column(
            metric_header(category),
            entries.iter().map(|e| metric_value(category, e)).collect(),
        )
        .add_column(
            "Difficulty",
            entries.iter().map(|e| e.difficulty.label().to_string()).collect(),
        )
        .add_column(
            "Role",
            entries.iter().map(|e| e.role.label().to_string()).collect(),
        )
        .add_column(
            "Date",
            entries
                .iter()
                .map(|e| dates::format_short_date(e.completed_at))
                .collect(),
        );

    Some(table.build())
}

fn metric_header(category: Category) -> &'static str {
    match category {
        Category::FastestWins => "Time",
        Category::HighestScores => "Score",
        Category::BestAccuracy => "Accuracy",
    }
}

fn metric_value(category: Category, entry: &LeaderboardEntry) -> String {
    match category {
        Category::FastestWins => dates::format_seconds(entry.time_elapsed),
        Category::HighestScores => format!("{:.0}", entry.score),
        Category::BestAccuracy => format!("{:.0}%", entry.accuracy * 100.0),
    }
}
