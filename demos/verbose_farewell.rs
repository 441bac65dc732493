use ticli::{CommandLine, GroupDefinition, Hook, OptionDeclaration, Outcome, Parameter, TypeSpec};

fn main() {
    let farewell = GroupDefinition::new("Farewell")
        .about("Command the computer to bid you farewell.")
        .option(
            OptionDeclaration::new(
                "dialect",
                TypeSpec::literal(["formal", "informal", "hillbilly"]),
            )
            .default("formal")
            .help("Language dialect to use for farewell."),
        )
        .post_call(Hook::new(Vec::<Parameter>::new(), |instance, _| {
            let dialect: String = instance.get_as("dialect")?;
            let farewell = match dialect.as_str() {
                "informal" => "Bye!",
                "hillbilly" => "Y'all come back now, ya hear!",
                _ => "Goodbye.",
            };
            instance.print(farewell);
            Ok(Outcome::Chain)
        }))
        .build();

    let base = farewell.clone();
    let verbose_farewell = GroupDefinition::new("VerboseFarewell")
        .about("Command the computer to bid you farewell with verbosity.")
        .extends(&farewell)
        .option(
            OptionDeclaration::new("verbose", TypeSpec::Bool)
                .default(false)
                .help("Enable verbose output."),
        )
        .post_call(Hook::new(Vec::<Parameter>::new(), move |instance, bound| {
            let verbose: bool = instance.get_as("verbose")?;

            if verbose {
                instance.print("getting ready to bid you farewell");
            }

            base.post_call().call(instance, bound)?;

            if verbose {
                instance.print("finished bidding you farewell");
            }

            Ok(Outcome::Chain)
        }))
        .build();

    CommandLine::new("verbose_farewell").fire_group(&verbose_farewell);
}
