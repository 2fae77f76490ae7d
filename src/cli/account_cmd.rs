use clap::Subcommand;

#[derive(Subcommand, Debug, Clone)]
pub enum AccountCmd {
    #[command(
        about = "Change username and password",
        long_about = "Replace the stored credentials and sign in under the new username. The password needs at least 4 characters."
    )]
    Change {
        #[arg(long, short = 'u', value_name = "NAME")]
        username: String,
        #[arg(long, value_name = "PASSWORD", help = "Prompted for on a terminal when omitted")]
        password: Option<String>,
        #[arg(long, value_name = "PASSWORD", help = "Prompted for on a terminal when omitted")]
        confirm: Option<String>,
    },
    #[command(about = "Show who is signed in")]
    Show,
}
