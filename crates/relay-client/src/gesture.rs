//! Gesture input for the terminal client.
//!
//! One command per line:
//!
//! ```text
//! drag e2      enter e4      leave e4      drop e4
//! click e8     hover e7      save
//! move e2 e4   (drag + enter + drop)
//! e2e4         (same as move)
//! ```

use std::str::FromStr;

use chess_core::Cell;

use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    DragStarted(Cell),
    DragEntered(Cell),
    DragLeft(Cell),
    Drop(Cell),
    CandidateClicked(Cell),
    CandidateHovered(Cell),
    SaveRestore,
}

fn cell_arg(arg: Option<&str>, command: &str) -> Result<Cell, ClientError> {
    let arg = arg.ok_or_else(|| ClientError::Gesture(format!("'{command}' needs a cell")))?;
    Ok(arg.parse()?)
}

impl FromStr for Gesture {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let command = words.next().unwrap_or_default();
        let arg = words.next();
        let gesture = match command {
            "drag" => Gesture::DragStarted(cell_arg(arg, command)?),
            "enter" => Gesture::DragEntered(cell_arg(arg, command)?),
            "leave" => Gesture::DragLeft(cell_arg(arg, command)?),
            "drop" => Gesture::Drop(cell_arg(arg, command)?),
            "click" => Gesture::CandidateClicked(cell_arg(arg, command)?),
            "hover" => Gesture::CandidateHovered(cell_arg(arg, command)?),
            "save" => Gesture::SaveRestore,
            other => return Err(ClientError::Gesture(format!("unknown gesture '{other}'"))),
        };
        if words.next().is_some() {
            return Err(ClientError::Gesture(format!("too many arguments in '{s}'")));
        }
        Ok(gesture)
    }
}

/// Parse one input line into the gestures it stands for.
pub fn parse_line(line: &str) -> Result<Vec<Gesture>, ClientError> {
    let line = line.trim();
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        [] => Ok(Vec::new()),
        ["move", from, to] => Ok(full_move(from.parse()?, to.parse()?)),
        [word] => match compact_move(word) {
            Some((from, to)) => Ok(full_move(from, to)),
            None => Ok(vec![line.parse()?]),
        },
        _ => Ok(vec![line.parse()?]),
    }
}

/// "e2e4" style coordinates.
fn compact_move(word: &str) -> Option<(Cell, Cell)> {
    if word.len() != 4 || !word.is_char_boundary(2) {
        return None;
    }
    let (from, to) = word.split_at(2);
    Some((from.parse().ok()?, to.parse().ok()?))
}

fn full_move(from: Cell, to: Cell) -> Vec<Gesture> {
    vec![
        Gesture::DragStarted(from),
        Gesture::DragEntered(to),
        Gesture::Drop(to),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(s: &str) -> Cell {
        s.parse().unwrap()
    }

    #[test]
    fn test_single_gestures() {
        assert_eq!("drag e2".parse::<Gesture>().unwrap(), Gesture::DragStarted(cell("e2")));
        assert_eq!("hover c7".parse::<Gesture>().unwrap(), Gesture::CandidateHovered(cell("c7")));
        assert_eq!("save".parse::<Gesture>().unwrap(), Gesture::SaveRestore);
    }

    #[test]
    fn test_bad_input() {
        assert!(matches!("drop".parse::<Gesture>(), Err(ClientError::Gesture(_))));
        assert!(matches!("drop z9".parse::<Gesture>(), Err(ClientError::Board(_))));
        assert!("fly e4".parse::<Gesture>().is_err());
        assert!("drop e4 e5".parse::<Gesture>().is_err());
    }

    #[test]
    fn test_move_shorthands() {
        let expected = vec![
            Gesture::DragStarted(cell("e2")),
            Gesture::DragEntered(cell("e4")),
            Gesture::Drop(cell("e4")),
        ];
        assert_eq!(parse_line("move e2 e4").unwrap(), expected);
        assert_eq!(parse_line("  e2e4 ").unwrap(), expected);
        assert!(parse_line("").unwrap().is_empty());
        assert_eq!(parse_line("drop e4").unwrap(), vec![Gesture::Drop(cell("e4"))]);
        assert_eq!(parse_line("save").unwrap(), vec![Gesture::SaveRestore]);
        assert!(parse_line("drop").is_err());
    }
}
