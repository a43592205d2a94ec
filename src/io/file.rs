use std::path::Path;

use serde::Deserialize;

use crate::error::Result;
use crate::model::{Board, Feature};

/// Accepted on-disk shapes: a full board, or a bare list of feature records.
#[derive(Deserialize)]
#[serde(untagged)]
enum BoardFile {
    Board(Board),
    Features(Vec<Feature>),
}

/// Save a board to a JSON file.
pub fn save_board(board: &Board, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(board)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Load a board from a JSON file.
pub fn load_board(path: &Path) -> Result<Board> {
    let json = std::fs::read_to_string(path)?;
    let board = match serde_json::from_str::<BoardFile>(&json)? {
        BoardFile::Board(board) => board,
        BoardFile::Features(features) => {
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Imported Board");
            let mut board = Board::new(name.trim_end_matches(".board"));
            board.features = features;
            board
        }
    };
    tracing::info!(path = %path.display(), features = board.features.len(), "loaded board");
    Ok(board)
}
