//! Terminal host for the users admin screen.
//!
//! Every invocation mounts the table (one list request), performs a single
//! screen action through the same code paths a graphical host would use,
//! and prints the resulting grid.

mod render;

use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use user_admin_core::{
    ClientConfig, Field, FormError, FormState, Gender, RecordTable, UreqTransport, User,
};

#[derive(Parser)]
#[command(name = "user-admin", about = "Manage user records against the users API")]
struct Cli {
    /// API base URL; falls back to USER_API_BASE_URL, then http://localhost:3000.
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the users grid.
    List,
    /// Submit the "add user" form.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        birthday: String,
        #[arg(long)]
        address: String,
    },
    /// Submit the "edit user" form; omitted fields keep their current value.
    Edit {
        id: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Edit grid cells in place.
    Set {
        id: String,
        #[command(flatten)]
        fields: FieldArgs,
        #[arg(long, value_enum)]
        gender: Option<GenderArg>,
    },
    /// Delete a user.
    Delete { id: String },
}

#[derive(clap::Args)]
struct FieldArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    birthday: Option<String>,
    #[arg(long)]
    address: Option<String>,
}

impl FieldArgs {
    fn apply_to_form(self, state: &mut FormState) {
        let pairs = [
            (Field::Name, self.name),
            (Field::Phone, self.phone),
            (Field::Birthday, self.birthday),
            (Field::Address, self.address),
        ];
        for (field, value) in pairs {
            if let Some(value) = value {
                state.set(field, value);
            }
        }
    }

    fn apply_to_user(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(phone) = self.phone {
            user.phone = phone;
        }
        if let Some(birthday) = self.birthday {
            user.birthday = birthday;
        }
        if let Some(address) = self.address {
            user.address = address;
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum GenderArg {
    Male,
    Female,
}

impl From<GenderArg> for Gender {
    fn from(arg: GenderArg) -> Self {
        match arg {
            GenderArg::Male => Gender::Male,
            GenderArg::Female => Gender::Female,
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "user_admin_core=info,user_admin=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = match cli.base_url.as_deref() {
        Some(url) => ClientConfig::new(url),
        None => ClientConfig::from_env(),
    }
    .context("invalid API base URL")?;
    tracing::debug!(base_url = %config.base_url, "configured");

    let transport = UreqTransport::new();
    let mut table = RecordTable::new(&config);
    table.load(&transport);
    if let Some(banner) = table.load_error_banner() {
        bail!(banner);
    }

    match cli.command {
        Command::List => {}
        Command::Add {
            name,
            phone,
            birthday,
            address,
        } => {
            table.open_create();
            let state = table.create_form_mut().state_mut();
            state.set(Field::Name, name);
            state.set(Field::Phone, phone);
            state.set(Field::Birthday, birthday);
            state.set(Field::Address, address);
            if let Some(code) = submit(&mut table, &transport)? {
                return Ok(code);
            }
        }
        Command::Edit { id, fields } => {
            let user = existing(&table, &id)?;
            if !table.begin_edit(&user) {
                bail!("another edit is still being submitted");
            }
            if let Some(form) = table.edit_form_mut() {
                fields.apply_to_form(form.state_mut());
            }
            if let Some(code) = submit(&mut table, &transport)? {
                return Ok(code);
            }
        }
        Command::Set { id, fields, gender } => {
            let mut edited = existing(&table, &id)?;
            fields.apply_to_user(&mut edited);
            if let Some(gender) = gender {
                edited.gender = gender.into();
            }
            let shown = table.inline_update(&transport, edited.clone());
            if shown != edited {
                bail!("update of {id} was not applied");
            }
        }
        Command::Delete { id } => {
            existing(&table, &id)?;
            if !table.delete(&transport, &id) {
                bail!("delete of {id} failed");
            }
        }
    }

    print!("{}", render::render_grid(&table.rows()));
    Ok(ExitCode::SUCCESS)
}

fn existing(table: &RecordTable, id: &str) -> anyhow::Result<User> {
    table
        .find(id)
        .cloned()
        .with_context(|| format!("no user with id {id}"))
}

/// Submit the open modal. Validation failures are printed and turn into exit
/// code 2; backend failures are errors.
fn submit(table: &mut RecordTable, transport: &UreqTransport) -> anyhow::Result<Option<ExitCode>> {
    match table.submit_modal(transport) {
        Ok(true) => Ok(None),
        Ok(false) => bail!("request was not accepted by the server"),
        Err(FormError::Invalid(errors)) => {
            eprint!("{}", render::render_errors(&errors));
            Ok(Some(ExitCode::from(2)))
        }
        Err(err) => Err(err.into()),
    }
}
