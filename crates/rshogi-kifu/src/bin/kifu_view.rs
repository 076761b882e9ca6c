// JKF kifu viewer

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use rshogi_kifu::{Color, MoveTree, NotationStyle, Piece, kif};

#[derive(Parser, Debug)]
#[command(author, version, about = "Show a position from a JKF kifu", long_about = None)]
struct Args {
    /// JKF file ("-" reads stdin)
    file: PathBuf,

    /// Ply to show (default: last ply of the selected line)
    #[arg(long)]
    ply: Option<usize>,

    /// Select a variation, SLOT:VARIANT (repeatable, applied in order)
    #[arg(long = "fork", value_parser = parse_fork)]
    forks: Vec<(usize, usize)>,

    /// Show the board from White's side
    #[arg(long)]
    flip: bool,

    /// Use ☗☖ instead of ▲△
    #[arg(long)]
    shogi_glyphs: bool,

    /// Print the position as JSON
    #[arg(long, conflicts_with = "kif")]
    json: bool,

    /// Print the selected line as KIF
    #[arg(long)]
    kif: bool,

    /// Replay every variation and report inconsistencies
    #[arg(long)]
    check: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn parse_fork(s: &str) -> Result<(usize, usize), String> {
    let (slot, variant) = s.split_once(':').ok_or_else(|| format!("expected SLOT:VARIANT, got {s:?}"))?;
    let slot = slot.parse().map_err(|e| format!("invalid slot {slot:?}: {e}"))?;
    let variant = variant.parse().map_err(|e| format!("invalid variant {variant:?}: {e}"))?;
    Ok((slot, variant))
}

fn main() {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, log_level),
    )
    .format(|buf, record| writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args()))
    .write_style(env_logger::WriteStyle::Never)
    .target(env_logger::Target::Stderr)
    .init();

    if let Err(e) = run(&args) {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let source = read_source(&args.file)?;
    let mut tree = MoveTree::from_json_str(&source)
        .with_context(|| format!("failed to load {}", args.file.display()))?;
    if args.shogi_glyphs {
        tree.set_style(NotationStyle::Shogi);
    }

    if args.check {
        tree.verify().context("kifu has an inconsistent variation")?;
        log::info!("verified {} nodes", tree.node_count());
    }

    for &(slot, variant) in &args.forks {
        tree.switch_fork(slot, variant)
            .with_context(|| format!("cannot select variation {variant} at ply {slot}"))?;
    }
    let ply = args.ply.unwrap_or(tree.last_ply());
    tree.go_to(ply).with_context(|| format!("cannot move to ply {ply}"))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.kif {
        kif::write_kif(&mut out, &tree)?;
    } else if args.json {
        serde_json::to_writer_pretty(&mut out, &tree.snapshot(args.flip))?;
        writeln!(out)?;
    } else {
        print_position(&mut out, &tree, args.flip)?;
    }
    out.flush()?;
    Ok(())
}

fn read_source(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).context("failed to read stdin")?;
        return Ok(buf);
    }
    if !path.exists() {
        bail!("{} does not exist", path.display());
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn print_position<W: Write>(out: &mut W, tree: &MoveTree, flipped: bool) -> Result<()> {
    let cursor = tree.cursor();
    writeln!(out, "{}手目 {}", cursor, tree.notation(cursor)?)?;
    let top = if flipped { Color::Black } else { Color::White };
    writeln!(out, "{}", hand_line(tree, top))?;
    let files = if flipped { "  １ ２ ３ ４ ５ ６ ７ ８ ９" } else { "  ９ ８ ７ ６ ５ ４ ３ ２ １" };
    writeln!(out, "{files}")?;
    for row in tree.grid(flipped) {
        let line: String = row.iter().map(|cell| cell_text(*cell, flipped)).collect();
        writeln!(out, "|{line}|")?;
    }
    writeln!(out, "{}", hand_line(tree, top.opponent()))?;
    for comment in tree.comments(cursor)? {
        writeln!(out, "*{comment}")?;
    }
    let next = tree.fork_list(cursor + 1).unwrap_or_default();
    if !next.is_empty() {
        writeln!(out, "変化: {}", next.join(" / "))?;
    }
    Ok(())
}

fn cell_text(cell: Option<Piece>, flipped: bool) -> String {
    let Some(piece) = cell else {
        return " ・".to_string();
    };
    // 手前側の駒に印を付けない
    let near = if flipped { Color::White } else { Color::Black };
    format!("{}{}", if piece.color == near { ' ' } else { 'v' }, kif::bod_name(piece.kind))
}

fn hand_line(tree: &MoveTree, color: Color) -> String {
    let label = match color {
        Color::Black => "先手の持駒：",
        Color::White => "後手の持駒：",
    };
    let pieces: Vec<String> = tree
        .hand(color)
        .iter()
        .filter(|&(_, n)| n > 0)
        .map(|(kind, n)| if n > 1 { format!("{}{n}", kind.name()) } else { kind.name().to_string() })
        .collect();
    if pieces.is_empty() { format!("{label}なし") } else { format!("{label}{}", pieces.join(" ")) }
}
