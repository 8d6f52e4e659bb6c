//! Terminal output: plain echo, ASCII result tables and coloured SQL.
use crate::command::ResultSet;
use crate::sql::{HighlightedToken, TokenKind};
use crate::storage::Value;
use crossterm::{
    execute,
    style::{self, Stylize},
};

use std::io::{self, Write};

pub fn echo(s: String) {
    let _ = execute!(io::stdout(), style::Print(s));
    let _ = io::stdout().flush();
}

pub fn error(s: String) {
    let _ = execute!(io::stderr(), style::PrintStyledContent(s.red()));
    let _ = io::stderr().flush();
}

pub fn echo_lines(s: String) {
    for l in s.lines() {
        if execute!(io::stdout(), style::Print(format!("{}\n", l))).is_err() {
            continue;
        }
    }
    let _ = io::stdout().flush();
}

/// How a cell is shown in a result table.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        v => v.to_string(),
    }
}

pub fn echo_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut result = String::new();

    let mut column_widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, col) in row.iter().enumerate() {
            if let Some(width) = column_widths.get_mut(i) {
                *width = (*width).max(col.chars().count());
            }
        }
    }

    let border = {
        let mut line = String::from("+");
        for width in &column_widths {
            line.push_str(&"-".repeat(width + 2));
            line.push('+');
        }
        line.push('\n');
        line
    };
    let line = |cells: &[String]| {
        let mut line = String::from("|");
        for (i, width) in column_widths.iter().enumerate() {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            line.push_str(&format!(" {:<width$} |", cell, width = *width));
        }
        line.push('\n');
        line
    };

    result.push_str(&border);
    if !headers.is_empty() {
        result.push_str(&line(headers));
        result.push_str(&border);
    }
    for row in rows {
        result.push_str(&line(row));
    }
    result.push_str(&border);

    result
}

/// Renders a result set the way a SQL shell does, with a row count footer.
pub fn result_table(set: &ResultSet) -> String {
    if set.rows.is_empty() {
        return "Empty set\n".to_string();
    }
    let rows: Vec<Vec<String>> = set
        .rows
        .iter()
        .map(|r| r.iter().map(format_value).collect())
        .collect();
    let noun = if rows.len() == 1 { "row" } else { "rows" };
    format!("{}{} {} in set\n", echo_table(&set.columns, &rows), rows.len(), noun)
}

/// ANSI-coloured SQL for the terminal.
pub fn tokens_to_ansi(tokens: &[HighlightedToken]) -> String {
    tokens
        .iter()
        .map(|t| {
            let text = t.text.as_str();
            match t.kind {
                TokenKind::Keyword => text.blue().bold().to_string(),
                TokenKind::Function => text.magenta().bold().to_string(),
                TokenKind::String => text.green().to_string(),
                TokenKind::Number => text.dark_yellow().to_string(),
                TokenKind::Operator => text.red().to_string(),
                TokenKind::Comment => text.dark_grey().italic().to_string(),
                TokenKind::Identifier | TokenKind::Default => text.to_string(),
            }
        })
        .collect()
}

#[macro_export]
macro_rules! echo {
    ($($arg:tt)*) => {
        $crate::console::echo(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::console::error(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! echo_lines {
    ($($arg:tt)*) => {
        $crate::console::echo_lines(format!($($arg)*))
    };
}
