//! Operator input
//!
//! Anything typed (or scanned) that does not start with `:` is a barcode.
//! Lines starting with `:` are commands; cart lines are addressed by their
//! 1-based position as shown by `:list`.

use thiserror::Error;

pub const HELP: &str = "\
<barcode>             add one unit of the product
:list                 show the cart
:qty <line> <n>       set the quantity of a line (0 removes it)
:rm <line>            remove a line
:name|:phone|:email|:notes <text>
                      set customer details (empty clears)
:submit               create and complete the invoice
:cancel               empty the cart
:search <term>        search the catalog
:low [threshold]      products running out of stock
:label <barcode>      print a barcode label
:receipt <invoice-id> reprint an invoice
:stats                dashboard figures
:help                 this text
:quit                 leave";

/// Customer field addressed by a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerField {
    Name,
    Phone,
    Email,
    Notes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Scan(String),
    List,
    SetQuantity { line: usize, quantity: i64 },
    Remove { line: usize },
    Customer { field: CustomerField, value: String },
    Submit,
    Cancel,
    Search(String),
    LowStock(Option<i64>),
    Label(String),
    Receipt(String),
    Stats,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command :{0} (try :help)")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("{0:?} is not a number")]
    NotANumber(String),
}

/// Parse one input line
pub fn parse(input: &str) -> Result<Command, CommandError> {
    let input = input.trim();
    let Some(rest) = input.strip_prefix(':') else {
        return Ok(Command::Scan(input.to_string()));
    };

    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };

    let command = match name.to_lowercase().as_str() {
        "list" | "ls" => Command::List,
        "qty" => {
            let (line, quantity) = args
                .split_once(char::is_whitespace)
                .ok_or(CommandError::Usage(":qty <line> <n>"))?;
            Command::SetQuantity {
                line: line_number(line)?,
                quantity: number(quantity.trim())?,
            }
        }
        "rm" => Command::Remove {
            line: line_number(required(args, ":rm <line>")?)?,
        },
        "name" => customer(CustomerField::Name, args),
        "phone" => customer(CustomerField::Phone, args),
        "email" => customer(CustomerField::Email, args),
        "notes" => customer(CustomerField::Notes, args),
        "submit" | "pay" => Command::Submit,
        "cancel" => Command::Cancel,
        "search" => Command::Search(args.to_string()),
        "low" => Command::LowStock(if args.is_empty() {
            None
        } else {
            Some(number(args)?)
        }),
        "label" => Command::Label(required(args, ":label <barcode>")?.to_string()),
        "receipt" => Command::Receipt(required(args, ":receipt <invoice-id>")?.to_string()),
        "stats" => Command::Stats,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(command)
}

fn customer(field: CustomerField, value: &str) -> Command {
    Command::Customer {
        field,
        value: value.to_string(),
    }
}

fn required<'a>(args: &'a str, usage: &'static str) -> Result<&'a str, CommandError> {
    if args.is_empty() {
        Err(CommandError::Usage(usage))
    } else {
        Ok(args)
    }
}

fn number(s: &str) -> Result<i64, CommandError> {
    s.parse()
        .map_err(|_| CommandError::NotANumber(s.to_string()))
}

fn line_number(s: &str) -> Result<usize, CommandError> {
    s.trim_start_matches('#')
        .parse()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| CommandError::NotANumber(s.to_string()))
}
