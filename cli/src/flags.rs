use std::path::PathBuf;

xflags::xflags! {
    /// Highlight technetium sources and documentation.
    cmd tcdoc {
        /// Settings file. Defaults to `docs.toml` in the working directory.
        optional -c, --config path: PathBuf
        /// Log more. Repeat for trace output.
        repeated -v, --verbose

        /// Render source files, or every source under a directory, as HTML.
        cmd highlight {
            repeated paths: PathBuf
            /// Use this lexer instead of selecting one by file name.
            optional -l, --lang lang: String
            /// Fail on input that leaves a string or shell fragment open.
            optional --strict
            optional -n, --line-numbers
            /// Write `<name>.html` files here instead of to stdout.
            optional -o, --output dir: PathBuf
        }

        /// Print the token stream of a source file.
        cmd tokens {
            required path: PathBuf
            optional -l, --lang lang: String
            optional --json
        }

        /// Render a Markdown document with highlighted code blocks.
        cmd render {
            required input: PathBuf
            optional -n, --line-numbers
            optional -o, --output file: PathBuf
        }

        /// Print the style sheet for highlighted code.
        cmd style {
            optional --name name: String
            optional --selector selector: String
        }

        /// Print the resolved settings.
        cmd settings {}
    }
}
