use std::{
    fmt, fs,
    io::{self, BufRead, Read, Write},
};

use clap::{value_t, App, AppSettings, Arg, ArgMatches, ErrorKind, SubCommand};
use log::{debug, info};
use once_cell::sync::Lazy;
use rand::{rngs::StdRng, SeedableRng};
use regex::Regex;

use seabattle::{
    computer_player, generate_fleet, Board, Coordinate, Dimensions, Fleet, FleetBuilder,
    FleetGenerator, GameConfig, Knowledge, KnowledgeMap, ShotOutcome, TargetingEngine,
};

fn main() -> io::Result<()> {
    let matches = App::new("Battleship")
        .version("1.0")
        .author("Zachary Stewart <zachary@zstewart.com>")
        .about("Command line front end for the battleship computer opponent.")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("log the opponent's reasoning (RUST_LOG takes precedence)"),
        )
        .subcommand(
            SubCommand::with_name("fleet")
                .about("print a randomly placed fleet")
                .args(&board_args())
                .arg(seed_arg()),
        )
        .subcommand(
            SubCommand::with_name("target")
                .about("suggest the next shot for a partially explored board")
                .long_about(
                    "Reads the board from FILE, or stdin if no file is given. One row per \
                     line: '.' not shot, 'o' or '-' miss, 'x' or 'X' hit. Prints the \
                     suggested shot as 'row col'.",
                )
                .arg(fleet_arg())
                .arg(seed_arg())
                .arg(Arg::with_name("FILE").help("board to read").index(1)),
        )
        .subcommand(
            SubCommand::with_name("solve")
                .about("let the computer sink random fleets and report the shot counts")
                .args(&board_args())
                .arg(seed_arg())
                .arg(
                    Arg::with_name("games")
                        .short("n")
                        .long("games")
                        .value_name("GAMES")
                        .help("number of games to play")
                        .default_value("1")
                        .validator(is_count),
                ),
        )
        .subcommand(
            SubCommand::with_name("play")
                .about("play against the computer")
                .args(&board_args())
                .arg(seed_arg())
                .arg(
                    Arg::with_name("random_fleet")
                        .short("r")
                        .long("random-fleet")
                        .help("place your fleet at random instead of by hand"),
                ),
        )
        .get_matches();

    init_logging(matches.is_present("verbose"));

    match matches.subcommand() {
        ("fleet", Some(sub)) => print_fleet(sub),
        ("target", Some(sub)) => advise_target(sub),
        ("solve", Some(sub)) => solve(sub),
        ("play", Some(sub)) => play(sub),
        _ => unreachable!("a subcommand is required"),
    }
}

/// Install the logger. `RUST_LOG` wins over the `--verbose` default.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

/// Arguments describing the board and fleet.
fn board_args() -> Vec<Arg<'static, 'static>> {
    vec![
        Arg::with_name("width")
            .long("width")
            .value_name("WIDTH")
            .help("number of columns")
            .default_value("10")
            .validator(is_count),
        Arg::with_name("height")
            .long("height")
            .value_name("HEIGHT")
            .help("number of rows")
            .default_value("10")
            .validator(is_count),
        fleet_arg(),
    ]
}

fn fleet_arg() -> Arg<'static, 'static> {
    Arg::with_name("fleet")
        .short("f")
        .long("fleet")
        .value_name("FLEET")
        .help("ships as length:count pairs")
        .default_value("4:1,3:2,2:3,1:4")
        .validator(|value| value.parse::<Fleet>().map(drop).map_err(|e| e.to_string()))
}

fn seed_arg() -> Arg<'static, 'static> {
    Arg::with_name("seed")
        .short("s")
        .long("seed")
        .value_name("SEED")
        .help("seed for a repeatable game")
        .validator(|value| value.parse::<u64>().map(drop).map_err(|e| e.to_string()))
}

fn is_count(value: String) -> Result<(), String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_owned()),
        Ok(_) => Ok(()),
        Err(e) => Err(e.to_string()),
    }
}

/// Build the [`GameConfig`] from the board arguments.
fn game_config(matches: &ArgMatches) -> GameConfig {
    let width = value_t!(matches, "width", usize).unwrap_or_else(|e| e.exit());
    let height = value_t!(matches, "height", usize).unwrap_or_else(|e| e.exit());
    let fleet = value_t!(matches, "fleet", Fleet).unwrap_or_else(|e| e.exit());
    let dimensions = Dimensions::try_new(width, height).unwrap_or_else(|| {
        clap::Error::with_description(
            &format!("a {}x{} board is too large", width, height),
            ErrorKind::InvalidValue,
        )
        .exit()
    });
    GameConfig::new(dimensions, fleet)
}

fn make_rng(matches: &ArgMatches) -> StdRng {
    if matches.is_present("seed") {
        let seed = value_t!(matches, "seed", u64).unwrap_or_else(|e| e.exit());
        debug!("using seed {}", seed);
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_entropy()
    }
}

fn no_fleet(config: &GameConfig) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!(
            "fleet {} does not fit on a {}x{} board",
            config.fleet(),
            config.dimensions().width(),
            config.dimensions().height()
        ),
    )
}

fn other_error(err: impl std::error::Error + Send + Sync + 'static) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err)
}

/// `battleship fleet`
fn print_fleet(matches: &ArgMatches) -> io::Result<()> {
    let config = game_config(matches);
    let mut rng = make_rng(matches);
    let board = generate_fleet(&config, &mut rng).ok_or_else(|| no_fleet(&config))?;
    show_board(
        board.dimensions(),
        |coord| if board.is_ship(coord) { "#" } else { "." },
    );
    Ok(())
}

/// `battleship target`
fn advise_target(matches: &ArgMatches) -> io::Result<()> {
    let fleet = value_t!(matches, "fleet", Fleet).unwrap_or_else(|e| e.exit());
    let text = match matches.value_of("FILE") {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            text
        }
    };
    let knowledge = parse_knowledge(&text)?;
    let config = GameConfig::new(knowledge.dimensions(), fleet);
    let mut rng = make_rng(matches);
    let target = TargetingEngine::new(config)
        .next_target(&knowledge, &mut rng)
        .map_err(other_error)?;
    println!("{} {}", target.row, target.col);
    Ok(())
}

/// Parse a board drawn with one character per cell into a [`KnowledgeMap`].
fn parse_knowledge(text: &str) -> io::Result<KnowledgeMap> {
    static ROW: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[.oxX-]+$").unwrap());
    let invalid = |msg: String| io::Error::new(io::ErrorKind::InvalidData, msg);

    let rows: Vec<String> = text
        .lines()
        .map(|line| line.split_whitespace().collect::<String>())
        .filter(|row| !row.is_empty())
        .collect();
    if rows.is_empty() {
        return Err(invalid("the board is empty".to_owned()));
    }
    let width = rows[0].len();
    for (i, row) in rows.iter().enumerate() {
        if !ROW.is_match(row) {
            return Err(invalid(format!("row {} has unknown characters: {}", i, row)));
        }
        if row.len() != width {
            return Err(invalid(format!(
                "row {} has {} cells, expected {}",
                i,
                row.len(),
                width
            )));
        }
    }
    let dimensions = Dimensions::try_new(width, rows.len())
        .ok_or_else(|| invalid("the board is too large".to_owned()))?;

    let mut knowledge = KnowledgeMap::new(dimensions);
    for (coord, ch) in dimensions.positions().zip(rows.iter().flat_map(|row| row.chars())) {
        let value = match ch {
            '.' => continue,
            'o' | '-' => Knowledge::Empty,
            _ => Knowledge::Ship,
        };
        knowledge.set(coord, value).map_err(other_error)?;
    }
    Ok(knowledge)
}

/// `battleship solve`
fn solve(matches: &ArgMatches) -> io::Result<()> {
    let config = game_config(matches);
    let games = value_t!(matches, "games", usize).unwrap_or_else(|e| e.exit());
    let mut rng = make_rng(matches);
    let engine = TargetingEngine::new(config.clone());

    let mut total = 0;
    for game in 1..=games {
        let mut hidden = generate_fleet(&config, &mut rng).ok_or_else(|| no_fleet(&config))?;
        let mut knowledge = KnowledgeMap::new(config.dimensions());
        let mut shots = 0;
        while !hidden.defeated() {
            let target = engine
                .next_target(&knowledge, &mut rng)
                .map_err(other_error)?;
            let outcome = hidden.shoot(target).map_err(other_error)?;
            knowledge.record(target, outcome).map_err(other_error)?;
            shots += 1;
        }
        info!("game {} finished in {} shots", game, shots);
        println!("game {}: {} shots", game, shots);
        total += shots;
    }
    if games > 1 {
        println!("average: {:.2} shots", total as f64 / games as f64);
    }
    Ok(())
}

/// `battleship play`
fn play(matches: &ArgMatches) -> io::Result<()> {
    let config = game_config(matches);
    let mut rng = make_rng(matches);
    let stdin = io::stdin();
    let mut input = InputReader::new(stdin.lock());

    let mut own = if matches.is_present("random_fleet") {
        generate_fleet(&config, &mut rng).ok_or_else(|| no_fleet(&config))?
    } else {
        choose_fleet(&config, &mut rng, &mut input)?
    };
    let mut computer = computer_player(&config, rng).map_err(other_error)?;
    let mut scouted = KnowledgeMap::new(config.dimensions());

    println!();
    println!("Enter shots as 'row col'.");
    loop {
        println!();
        println!("Opponent's board:");
        show_board(scouted.dimensions(), |coord| {
            KnowledgeCell(scouted.get(coord).unwrap_or(Knowledge::Unknown))
        });
        println!();
        println!("Your board:");
        show_board(own.dimensions(), |coord| RevealedCell::of(&own, coord));
        println!();

        let outcome = loop {
            let target = input.read_input("Fire at:", parse_coordinate)?;
            match computer.receive_shot(target) {
                Ok(outcome) => {
                    scouted.record(target, outcome).map_err(other_error)?;
                    break outcome;
                }
                Err(err) => println!("{}", err),
            }
        };
        println!("You: {}", OutcomeText(outcome));
        if let ShotOutcome::Defeated(_) = outcome {
            println!("You win!");
            return Ok(());
        }

        let target = computer.next_target().map_err(other_error)?;
        let outcome = own.shoot(target).map_err(other_error)?;
        computer
            .record_result(target, outcome)
            .map_err(other_error)?;
        println!("Computer fires at {}: {}", target, OutcomeText(outcome));
        if let ShotOutcome::Defeated(_) = outcome {
            println!("The computer wins.");
            return Ok(());
        }
    }
}

/// Let the player build a fleet by hand, one ship cell at a time.
fn choose_fleet<B: BufRead>(
    config: &GameConfig,
    rng: &mut StdRng,
    input: &mut InputReader<B>,
) -> io::Result<Board> {
    enum Command {
        Done,
        Add(Coordinate),
        Remove(Coordinate),
        Clear,
        RandomizeRest,
        Help,
    }
    static EDIT: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"^(?x)(?P<cmd>add|put|remove|rm|del)\s+
            (?P<row>[0-9]+)(?:\s*,\s*|\s+)(?P<col>[0-9]+)$",
        )
        .unwrap()
    });

    let mut builder = FleetBuilder::from_config(config);
    println!();
    println!("Place your ships one cell at a time. Type help or ? for commands.");
    loop {
        println!();
        if builder.ready() {
            println!("All ships placed, type done to start the game.");
        } else {
            let left: Vec<String> = builder
                .ships_left()
                .iter()
                .map(|(kind, count)| format!("{} x{}", kind, count))
                .collect();
            println!("Ships left to place: {}", left.join(", "));
        }
        show_board(builder.dimensions(), |coord| {
            if builder.is_ship(coord) {
                "#"
            } else {
                "~"
            }
        });
        println!();

        let cmd = input.read_input_lower(">", |line| match line {
            "?" | "help" | "h" => Some(Command::Help),
            "randomize" | "rand" | "random" => Some(Command::RandomizeRest),
            "done" | "start" => Some(Command::Done),
            "clear" => Some(Command::Clear),
            other => match EDIT.captures(other) {
                Some(caps) => {
                    let coord =
                        Coordinate::new(caps["row"].parse().ok()?, caps["col"].parse().ok()?);
                    Some(match &caps["cmd"] {
                        "add" | "put" => Command::Add(coord),
                        _ => Command::Remove(coord),
                    })
                }
                None => {
                    println!("Invalid command \"{}\". Use '?' for help", other);
                    None
                }
            },
        })?;

        match cmd {
            Command::Done => match builder.build() {
                Some(board) => return Ok(board),
                None => println!("You must place all your ships first!"),
            },
            Command::Add(coord) => {
                if let Err(err) = builder.add_cell(coord) {
                    println!("Cannot add {}: {}", err.placement(), err.reason());
                }
            }
            Command::Remove(coord) => {
                if let Err(err) = builder.remove_cell(coord) {
                    println!("Cannot remove {}: {}", err.placement(), err.reason());
                }
            }
            Command::Clear => builder.clear(),
            Command::RandomizeRest => {
                if FleetGenerator::new(&mut builder).generate(|_| true, rng).is_none() {
                    println!("The remaining ships do not fit around the ones already placed.");
                }
            }
            Command::Help => println!(
                "Available Commands:
    done                  if all ships are placed, start the game.
    add <row> <col>       add a ship cell. Cells next to each other join into one ship.
    remove <row> <col>    remove a ship cell, splitting its ship if needed.
    clear                 remove every ship.
    randomize             place the remaining ships at random."
            ),
        }
    }
}

fn parse_coordinate(text: &str) -> Option<Coordinate> {
    static COORD: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^(?P<row>[0-9]+)(?:\s*,\s*|\s+)(?P<col>[0-9]+)$").unwrap());
    match COORD.captures(text) {
        Some(caps) => Some(Coordinate::new(
            caps["row"].parse().ok()?,
            caps["col"].parse().ok()?,
        )),
        None => {
            println!("Expected a row and a column, like '3 7'.");
            None
        }
    }
}

/// Print a grid with row and column numbers. `cell` draws the cell at a coordinate.
fn show_board<F, D>(dim: Dimensions, cell: F)
where
    F: Fn(Coordinate) -> D,
    D: fmt::Display,
{
    print!("   ");
    for col in 0..dim.width() {
        print!("{:^3}", col);
    }
    println!();
    for (i, row) in dim.rows().enumerate() {
        print!("{:>2} ", i);
        for coord in row {
            print!("{:^3}", cell(coord));
        }
        println!();
    }
}

/// Display helper for a cell of the opponent's board as far as it is known.
struct KnowledgeCell(Knowledge);

impl fmt::Display for KnowledgeCell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(match self.0 {
            Knowledge::Unknown => "~",
            Knowledge::Empty => "o",
            Knowledge::Ship => "x",
        })
    }
}

/// Display helper for a cell of the player's own board.
enum RevealedCell {
    Water,
    Miss,
    Ship,
    Hit,
    Sunk,
}

impl RevealedCell {
    fn of(board: &Board, coord: Coordinate) -> Self {
        match board.get(coord) {
            None => RevealedCell::Water,
            Some(cell) => match cell.ship() {
                None if cell.damaged() => RevealedCell::Miss,
                None => RevealedCell::Water,
                Some(ship) if ship.sunk() => RevealedCell::Sunk,
                Some(_) if cell.damaged() => RevealedCell::Hit,
                Some(_) => RevealedCell::Ship,
            },
        }
    }
}

impl fmt::Display for RevealedCell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(match self {
            RevealedCell::Water => "~",
            RevealedCell::Miss => "o",
            RevealedCell::Ship => "#",
            RevealedCell::Hit => "x",
            RevealedCell::Sunk => "X",
        })
    }
}

/// Display helper describing a shot outcome.
struct OutcomeText(ShotOutcome);

impl fmt::Display for OutcomeText {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            ShotOutcome::Miss => f.write_str("miss"),
            ShotOutcome::Hit(kind) => write!(f, "hit a {}", kind),
            ShotOutcome::Sunk(kind) => write!(f, "sunk a {}", kind),
            ShotOutcome::Defeated(kind) => write!(f, "sunk a {}, the last ship", kind),
        }
    }
}

/// Helper to read input from the player.
struct InputReader<B> {
    read: B,
    buf: String,
}

impl<B> InputReader<B> {
    fn new(read: B) -> Self {
        Self {
            read,
            buf: String::new(),
        }
    }
}

impl<B: BufRead> InputReader<B> {
    /// Like [`read_input`][Self::read_input], but lowercases the input first.
    fn read_input_lower<F, T>(&mut self, prompt: &str, mut checker: F) -> io::Result<T>
    where
        F: FnMut(&str) -> Option<T>,
    {
        loop {
            self.read_line(prompt)?;
            self.buf.make_ascii_lowercase();
            if let Some(val) = checker(self.buf.trim()) {
                return Ok(val);
            }
        }
    }

    /// Repeatedly tries to read input until the input checker returns `Some`.
    fn read_input<F, T>(&mut self, prompt: &str, mut checker: F) -> io::Result<T>
    where
        F: FnMut(&str) -> Option<T>,
    {
        loop {
            self.read_line(prompt)?;
            if let Some(val) = checker(self.buf.trim()) {
                return Ok(val);
            }
        }
    }

    /// Prompt and read one line into the buffer. Exits on end of input.
    fn read_line(&mut self, prompt: &str) -> io::Result<()> {
        print!("{} ", prompt);
        io::stdout().flush()?;
        self.buf.clear();
        if self.read.read_line(&mut self.buf)? == 0 {
            println!();
            std::process::exit(0);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use seabattle::ShipKind;

    use super::*;

    fn build(script: &str) -> Board {
        let config = GameConfig::new(Dimensions::new(4, 4), "2:1,1:1".parse().unwrap());
        let mut input = InputReader::new(Cursor::new(script.to_owned()));
        choose_fleet(&config, &mut StdRng::seed_from_u64(0), &mut input).unwrap()
    }

    #[test]
    fn fleet_is_built_cell_by_cell() {
        // The early done is refused and the cell bending the two-deck is rejected.
        let board = build("done\nadd 0 0\nADD 0,1\nadd 1 1\nadd 3 3\ndone\n");
        assert_eq!(board.ship_cells(), 3);
        assert_eq!(board.ship_kind_at(Coordinate::new(0, 1)), Some(ShipKind::TWO));
        assert_eq!(board.ship_kind_at(Coordinate::new(3, 3)), Some(ShipKind::ONE));
        assert!(!board.is_ship(Coordinate::new(1, 1)));
    }

    #[test]
    fn edits_clear_and_randomize() {
        let board = build("add 0 0\nrm 0 0\nadd 3 0\nclear\nadd 2 2\nrandomize\ndone\n");
        assert_eq!(board.ship_cells(), 3);
        assert_eq!(board.iter_ships().count(), 2);
        assert_eq!(board.ship_kind_at(Coordinate::new(2, 2)), Some(ShipKind::ONE));
    }

    #[test]
    fn knowledge_rows_are_parsed() {
        let knowledge = parse_knowledge("..x\no-X\n").unwrap();
        assert_eq!(knowledge.dimensions(), Dimensions::new(3, 2));
        assert_eq!(knowledge.get(Coordinate::new(0, 2)), Some(Knowledge::Ship));
        assert_eq!(knowledge.get(Coordinate::new(1, 1)), Some(Knowledge::Empty));
        assert_eq!(knowledge.unknown_count(), 2);
        assert!(parse_knowledge("..\n...\n").is_err());
        assert!(parse_knowledge("..?\n").is_err());
    }
}
