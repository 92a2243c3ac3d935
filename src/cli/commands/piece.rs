//! `jqt piece` command - Cutting sheet management

use clap::Subcommand;
use console::style;
use miette::Result;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::helpers::{confirm, display_ref, mutate, num, open_store, print_done};
use crate::cli::output::print_list;
use crate::cli::GlobalOpts;
use crate::entities::piece::{EdgeLetter, PieceDraft, PiecePatch};

#[derive(Subcommand, Debug)]
pub enum PieceCommands {
    /// Add a piece to the cutting sheet
    Add(AddArgs),

    /// List pieces with derived quantities
    List,

    /// Change a piece's dimensions or finish
    Update(UpdateArgs),

    /// Remove a piece
    Rm(RmArgs),
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Material name, matched exactly against the catalog
    #[arg(long, short = 'm')]
    pub material: String,

    /// Length in mm
    #[arg(long, short = 'l')]
    pub length: f64,

    /// Width in mm (ignored for bar stock)
    #[arg(long, short = 'w', default_value_t = 0.0)]
    pub width: f64,

    /// Number of identical copies
    #[arg(long, short = 'q', default_value_t = 1.0)]
    pub quantity: f64,

    /// Piece name (e.g. "Side panel")
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Edge band color
    #[arg(long)]
    pub edge_color: Option<String>,

    /// Edge band pattern: O, I, U, C, H or L
    #[arg(long, short = 'e')]
    pub edge: Option<EdgeLetter>,

    /// Paint color (metal pieces)
    #[arg(long)]
    pub paint: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    /// Piece ID or short ID (PCE@N)
    pub id: String,

    #[arg(long, short = 'm')]
    pub material: Option<String>,

    #[arg(long, short = 'l')]
    pub length: Option<f64>,

    #[arg(long, short = 'w')]
    pub width: Option<f64>,

    #[arg(long, short = 'q')]
    pub quantity: Option<f64>,

    #[arg(long, short = 'n')]
    pub name: Option<String>,

    #[arg(long)]
    pub edge_color: Option<String>,

    /// Edge band pattern: O, I, U, C, H or L
    #[arg(long, short = 'e', conflicts_with = "no_edge")]
    pub edge: Option<EdgeLetter>,

    /// Remove the edge band pattern
    #[arg(long)]
    pub no_edge: bool,

    #[arg(long)]
    pub paint: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct RmArgs {
    /// Piece ID or short ID (PCE@N)
    pub id: String,

    /// Skip confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Tabled, Serialize)]
struct PieceRow {
    #[tabled(rename = "SHORT")]
    short: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "MATERIAL")]
    material: String,
    #[tabled(rename = "L")]
    length: f64,
    #[tabled(rename = "W")]
    width: f64,
    #[tabled(rename = "QTY")]
    quantity: f64,
    #[tabled(rename = "EDGE")]
    edge: String,
    #[tabled(rename = "AREA m2")]
    area_m2: String,
    #[tabled(rename = "EDGE m")]
    edge_m: String,
    #[tabled(rename = "FASTENERS")]
    fasteners: f64,
}

pub fn run(cmd: PieceCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        PieceCommands::Add(args) => run_add(args),
        PieceCommands::List => run_list(global),
        PieceCommands::Update(args) => run_update(args),
        PieceCommands::Rm(args) => run_rm(args),
    }
}

fn run_add(args: AddArgs) -> Result<()> {
    let draft = PieceDraft {
        material: args.material,
        length: args.length,
        width: args.width,
        quantity: args.quantity,
        name: args.name,
        edge_color: args.edge_color,
        edge_letter: args.edge,
        paint_color: args.paint,
    };
    let (store, id) = mutate(|store| Ok(store.add_piece(draft)?.id))?;

    if let Some(piece) = store.pieces().iter().find(|p| p.id == id) {
        print_done("Added", "piece", &display_ref(&store, &id), piece.display_name());
        println!(
            "   {} m2, {} m edge, {} fasteners",
            num(piece.metrics.area_mm2 / 1e6),
            num(piece.metrics.edge_length_mm / 1000.0),
            piece.metrics.fasteners
        );
    }
    Ok(())
}

fn run_list(global: &GlobalOpts) -> Result<()> {
    let (_, store) = open_store()?;
    let pieces = store.pieces();

    let rows: Vec<PieceRow> = pieces
        .iter()
        .map(|p| PieceRow {
            short: display_ref(&store, &p.id),
            name: p.name.clone(),
            material: p.material.clone(),
            length: p.length,
            width: p.width,
            quantity: p.quantity,
            edge: match (&p.edge_letter, &p.edge_color) {
                (Some(letter), Some(color)) => format!("{} {}", letter, color),
                (Some(letter), None) => letter.to_string(),
                _ => "-".to_string(),
            },
            area_m2: num(p.metrics.area_mm2 / 1e6),
            edge_m: num(p.metrics.edge_length_mm / 1000.0),
            fasteners: p.metrics.fasteners,
        })
        .collect();
    let ids: Vec<String> = pieces.iter().map(|p| p.id.to_string()).collect();

    print_list(pieces, &rows, &ids, global.output, "pieces")
}

fn run_update(args: UpdateArgs) -> Result<()> {
    let edge_letter = if args.no_edge {
        Some(None)
    } else {
        args.edge.map(Some)
    };
    let patch = PiecePatch {
        material: args.material,
        length: args.length,
        width: args.width,
        quantity: args.quantity,
        name: args.name,
        edge_color: args.edge_color,
        edge_letter,
        paint_color: args.paint,
    };
    let (store, id) = mutate(|store| Ok(store.update_piece(&args.id, patch)?.id))?;
    print_done("Updated", "piece", &display_ref(&store, &id), "");
    Ok(())
}

fn run_rm(args: RmArgs) -> Result<()> {
    if !confirm(&format!("Remove piece {}?", args.id), args.yes)? {
        println!("{}", style("Cancelled").dim());
        return Ok(());
    }
    let (_, piece) = mutate(|store| Ok(store.remove_piece(&args.id)?))?;
    print_done("Removed", "piece", &args.id, piece.display_name());
    Ok(())
}
