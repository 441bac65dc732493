use ticli::derive::*;
use ticli::prelude::*;
use ticli::{CommandLine, Hook, Outcome, Parameter};

/// Command the computer to greet you.
#[derive(OptionGroup)]
#[ticli(name = "greet")]
#[allow(dead_code)]
struct Greet {
    /// Language dialect to use for greeting.
    #[ticli(default = "formal", choices = ["formal", "informal", "hillbilly"])]
    dialect: String,

    /// Enable verbose output.
    #[ticli(default = false)]
    verbose: bool,
}

fn main() {
    let greet = Greet::definition()
        .post_call(Hook::new(Vec::<Parameter>::new(), |instance, _| {
            let dialect: String = instance.get_as("dialect")?;
            let verbose: bool = instance.get_as("verbose")?;
            let greeting = match dialect.as_str() {
                "informal" => "Hi!",
                "hillbilly" => "Howdy, there!",
                _ => "Hello.",
            };

            if verbose {
                instance.print("getting ready to greet");
            }

            instance.print(greeting);

            if verbose {
                instance.print("finished greeting");
            }

            Ok(Outcome::Chain)
        }))
        .build();

    CommandLine::new("greet").fire_group(&greet);
}
