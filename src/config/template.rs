/// Generate a starter `.fixers.toml`.
pub fn generate_init_template() -> String {
	r#"# Settings snapshot handed to every fixer.
[settings]
# Group currency amounts in the sidebar and shop, e.g. 1234567 -> 1,234,567.
add_thousands_separator = true

# Rules decide when an augmentation should run, based on the game state.
# Matchers: { in_area = N }, { in_setting = N }, { in_storylet = N },
#           { and = [a, b] }, { or = [a, b] }
[[rules]]
name = "example"
when = { or = [{ in_area = 1 }, { and = [{ in_setting = 2 }, { in_storylet = 3 }] }] }
"#
	.to_string()
}
