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

    CommandLine::new("farewell").fire_group(&farewell);
}
