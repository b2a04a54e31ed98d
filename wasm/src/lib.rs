use minesweeper_ai as ms;
use ms::Oracle;
use wasm_bindgen::prelude::*;

fn cell_list(cells: impl IntoIterator<Item = ms::Cell>) -> Vec<u32> {
    cells
        .into_iter()
        .flat_map(|cell| [cell.row as u32, cell.col as u32])
        .collect()
}

fn load_agent(bts: &[u8]) -> Result<ms::KnowledgeBase, String> {
    ms::KnowledgeBase::deserialize(bts).map_err(|e| e.to_string())
}

#[wasm_bindgen]
pub fn create_agent(height: u8, width: u8) -> Result<Vec<u8>, String> {
    console_error_panic_hook::set_once();

    let agent = ms::KnowledgeBase::new(height as usize, width as usize);
    agent.serialize().map_err(|e| e.to_string())
}

#[wasm_bindgen]
pub fn add_knowledge(bts: Vec<u8>, row: usize, col: usize, count: u8) -> Result<Vec<u8>, String> {
    console_error_panic_hook::set_once();

    let mut agent = load_agent(&bts)?;
    agent
        .add_knowledge(ms::Cell { row, col }, count as usize)
        .map_err(|e| e.to_string())?;
    agent.serialize().map_err(|e| e.to_string())
}

/// `[row, col]` of a known safe cell, or empty.
#[wasm_bindgen]
pub fn safe_move(bts: Vec<u8>) -> Result<Vec<u32>, String> {
    console_error_panic_hook::set_once();

    let agent = load_agent(&bts)?;
    Ok(cell_list(agent.safe_move()))
}

/// `[row, col]` of an unprobed cell not known to be a mine, or empty.
#[wasm_bindgen]
pub fn random_move(bts: Vec<u8>) -> Result<Vec<u32>, String> {
    console_error_panic_hook::set_once();

    let agent = load_agent(&bts)?;
    Ok(cell_list(agent.random_move(&mut rand::rng())))
}

/// Flattened `[row, col, row, col, ...]` pairs.
#[wasm_bindgen]
pub fn known_mines(bts: Vec<u8>) -> Result<Vec<u32>, String> {
    console_error_panic_hook::set_once();

    let agent = load_agent(&bts)?;
    Ok(cell_list(agent.mines().iter().copied()))
}

/// Flattened `[row, col, row, col, ...]` pairs.
#[wasm_bindgen]
pub fn known_safes(bts: Vec<u8>) -> Result<Vec<u32>, String> {
    console_error_panic_hook::set_once();

    let agent = load_agent(&bts)?;
    Ok(cell_list(agent.safes().iter().copied()))
}

#[wasm_bindgen]
pub fn create_board(height: u8, width: u8, mines: u8) -> Result<Vec<u8>, String> {
    console_error_panic_hook::set_once();

    let board = ms::Board::new(
        height as usize,
        width as usize,
        mines as usize,
        &mut rand::rng(),
    )
    .map_err(|e| e.to_string())?;
    board.serialize().map_err(|e| e.to_string())
}

/// The neighbor mine count at `(row, col)`, or -1 if the cell is a mine.
#[wasm_bindgen]
pub fn probe(bts: Vec<u8>, row: usize, col: usize) -> Result<i8, String> {
    console_error_panic_hook::set_once();

    let board = ms::Board::deserialize(&bts).map_err(|e| e.to_string())?;
    let cell = ms::Cell { row, col };
    if !board.in_bounds(cell) {
        return Err(format!("cell {cell} is off the board"));
    }
    if board.is_mine(cell) {
        return Ok(-1);
    }
    Ok(board.neighbor_mine_count(cell) as i8)
}
