//! Assembles generated statements into a complete C program.

use crate::runtime::Store;

const INDENT: &str = "    ";

/// Wraps `code` in a `main` function that declares every variable in
/// `store` and prints each of them once the statements have run.
pub fn c_program(code: &str, store: &Store) -> String {
    let mut s = String::from("#include <stdio.h>\n\nint main(void) {\n");

    let declarations = store.render_declarations();
    if !declarations.is_empty() {
        s.push_str(INDENT);
        s.push_str(&declarations);
    }

    for line in code.lines().filter(|line| !line.is_empty()) {
        s.push_str(INDENT);
        s.push_str(line);
        s.push('\n');
    }

    for (name, _) in store.iter() {
        s.push_str(&format!("{INDENT}printf(\"{name} = %g\\n\", {name});\n"));
    }

    s.push_str(INDENT);
    s.push_str("return 0;\n}\n");
    s
}

#[cfg(test)]
mod test {
    use super::c_program;
    use crate::runtime::Store;

    #[test]
    fn empty() {
        assert_eq!(
            c_program("", &Store::new()),
            "#include <stdio.h>\n\nint main(void) {\n    return 0;\n}\n"
        );
    }

    #[test]
    fn program() {
        let mut store = Store::new();
        store.put("x", 7.0);
        store.put("y", 14.0);
        let code = "x = 1+2*3;\ny = x*2;\n";

        assert_eq!(
            c_program(code, &store),
            "#include <stdio.h>\n\
             \n\
             int main(void) {\n\
             \x20   double x,y;\n\
             \x20   x = 1+2*3;\n\
             \x20   y = x*2;\n\
             \x20   printf(\"x = %g\\n\", x);\n\
             \x20   printf(\"y = %g\\n\", y);\n\
             \x20   return 0;\n\
             }\n"
        );
    }
}
