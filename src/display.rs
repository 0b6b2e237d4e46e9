use anyhow::Result;
use crossterm::{
    style::{style, Attribute, Color, PrintStyledContent},
    QueueableCommand,
};

use std::io::{stdout, Write};

use gomoku_ai::{Board, PlayerId, Pos, Roster};

const COLOURS: [Color; 4] = [Color::Red, Color::Yellow, Color::Cyan, Color::Green];

fn row_label(y: usize) -> String {
    format!("{:<2}| ", y)
}

/// The board as plain text, one line per row
pub fn plain(board: &Board, roster: &Roster) -> String {
    let mut lines = vec![format!("  /{}", "-".repeat(board.size()))];
    for (y, row) in board.render().iter().enumerate() {
        let marks: String = row
            .iter()
            .map(|cell| cell.map_or(' ', |player| roster.mark(player)))
            .collect();
        lines.push(format!("{}{}", row_label(y), marks));
    }
    lines.join("\n")
}

/// Draws the board to the terminal, highlighting the last move
pub fn display(board: &Board, roster: &Roster, last: Option<Pos>) -> Result<()> {
    let mut stdout = stdout();

    stdout.queue(PrintStyledContent(style(format!(
        "  /{}\n",
        "-".repeat(board.size())
    ))))?;
    for (y, row) in board.render().iter().enumerate() {
        stdout.queue(PrintStyledContent(style(row_label(y))))?;
        for (x, cell) in row.iter().enumerate() {
            let styled = match cell {
                Some(player) => {
                    let mark = style(roster.mark(*player).to_string())
                        .with(COLOURS[player.index() % COLOURS.len()])
                        .attribute(Attribute::Bold);
                    if last == Some((x, y)) {
                        mark.on(Color::DarkGrey)
                    } else {
                        mark
                    }
                }
                None => style("·".to_string()).with(Color::DarkGrey),
            };
            stdout.queue(PrintStyledContent(styled))?;
        }
        stdout.queue(PrintStyledContent(style("\n".to_string())))?;
    }
    stdout.flush()?;
    Ok(())
}

fn run_name(len: usize) -> String {
    match len {
        2 => "dual".to_string(),
        3 => "three".to_string(),
        4 => "four".to_string(),
        5 => "five".to_string(),
        6 => "six".to_string(),
        len => format!("run-of-{}", len),
    }
}

/// "[owning-groups for Circle -- dual x 2, three x 1]"
pub fn group_summary(board: &Board, roster: &Roster, player: PlayerId) -> String {
    let stats: Vec<String> = board
        .group_counts(player)
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count > 0)
        .map(|(len, count)| format!("{} x {}", run_name(len), count))
        .collect();
    format!(
        "[owning-groups for {} -- {}]",
        roster.name(player),
        stats.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_rendering() -> Result<()> {
        let mut board = Board::new(3, 2)?;
        board.place(0, 0, PlayerId(0))?;
        board.place(2, 1, PlayerId(1))?;
        let roster = Roster::standard(2);
        assert_eq!(plain(&board, &roster), "  /---\n0 | O  \n1 |   X\n2 |    ");
        Ok(())
    }

    #[test]
    fn summary_lists_groups_by_length() -> Result<()> {
        let mut board = Board::standard();
        for &(x, y) in [(1, 1), (2, 1), (5, 5), (5, 6), (5, 7)].iter() {
            board.place(x, y, PlayerId(0))?;
        }
        let roster = Roster::standard(2);
        assert_eq!(
            group_summary(&board, &roster, PlayerId(0)),
            "[owning-groups for Circle -- dual x 1, three x 1]"
        );
        assert_eq!(
            group_summary(&board, &roster, PlayerId(1)),
            "[owning-groups for Cross -- ]"
        );
        Ok(())
    }
}
