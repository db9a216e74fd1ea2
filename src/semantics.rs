use crate::{ParseTreeNode, SemanticAnalyzer, SemanticError, VariableMeta};
use std::collections::BTreeMap;

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self {
            variable_table: BTreeMap::new(),
            next_temp_id: 0,
        }
    }

    /// Walk the parse tree bottom-up and attach the synthesized attributes.
    ///
    /// Every internal node first receives the default synthesis: the children's
    /// node values concatenated left-to-right and their quadruple lists appended in
    /// the same order, which renumbers the local ids densely. The node's literal
    /// then dispatches to its translation rule. A node whose only child carries the
    /// identifier literal finally takes that literal over, so raw identifier names
    /// bubble up through the expression chain.
    pub fn analyze(&mut self, root: &mut ParseTreeNode) -> Result<(), SemanticError> {
        self.walk(root)
    }

    fn walk(&mut self, node: &mut ParseTreeNode) -> Result<(), SemanticError> {
        for index in 0..node.children.len() {
            self.walk(&mut node.children[index])?;
        }
        if node.is_leaf() {
            return Ok(());
        }

        synthesize_default(node);

        match node.literal.as_str() {
            "var_declaration" => self.handle_var_declaration(node)?,
            "opt_init" => self.handle_opt_init(node),
            "expression" => self.handle_expression(node)?,
            "simple_expression" | "additive_expression" | "term" => {
                self.handle_binary_operation(node)
            }
            "factor" => self.handle_factor(node),
            "prefix_expression" => self.handle_prefix_expression(node),
            "postfix_expression" => self.handle_postfix_expression(node),
            "selection_stmt" => self.handle_selection_stmt(node),
            "iteration_stmt" => self.handle_iteration_stmt(node),
            "opt_expression_stmt" => self.handle_opt_expression_stmt(node),
            _ => {}
        }

        if node.children.len() == 1 && node.children[0].literal == "T_IDENTIFIER" {
            node.literal = node.children[0].literal.clone();
        }
        Ok(())
    }

    /// The declared variables with their types and initial values.
    pub fn variable_table(&self) -> &BTreeMap<String, VariableMeta> {
        &self.variable_table
    }

    pub fn print_variable_table(&self) {
        for (name, meta) in &self.variable_table {
            println!("{}\t{}\t{}", name, meta.type_name, meta.value);
        }
    }

    fn new_temp(&mut self) -> String {
        let name = format!("t{}", self.next_temp_id);
        self.next_temp_id += 1;
        name
    }

    fn ensure_declared(&self, name: &str) -> Result<(), SemanticError> {
        if self.variable_table.contains_key(name) {
            Ok(())
        } else {
            Err(SemanticError::UndeclaredUse(name.to_string()))
        }
    }

    // type_specifier T_IDENTIFIER [opt_init] T_SEMICOLON
    fn handle_var_declaration(&mut self, node: &mut ParseTreeNode) -> Result<(), SemanticError> {
        let type_name = node.children[0].real_value.clone();
        let name = node.children[1].real_value.clone();
        let init = if node.children[2].literal == "opt_init" {
            node.children[2].real_value.clone()
        } else {
            String::from("NULL")
        };

        if self.variable_table.contains_key(&name) {
            return Err(SemanticError::Redeclaration(name));
        }
        self.variable_table.insert(
            name.clone(),
            VariableMeta {
                type_name: type_name.clone(),
                value: init.clone(),
            },
        );
        node.real_value = format!("{} {} {};", type_name, name, init);
        Ok(())
    }

    // T_ASSIGN expression
    fn handle_opt_init(&mut self, node: &mut ParseTreeNode) {
        node.real_value = node.children[1].real_value.clone();
    }

    // var T_ASSIGN expression; both raw identifier operands must be declared.
    fn handle_expression(&mut self, node: &mut ParseTreeNode) -> Result<(), SemanticError> {
        if node.children.len() == 1 {
            return Ok(());
        }

        let var = node.children[0].real_value.clone();
        let op = node.children[1].real_value.clone();
        let exp = node.children[2].real_value.clone();
        if node.children[0].literal == "T_IDENTIFIER" {
            self.ensure_declared(&var)?;
        }
        if node.children[2].literal == "T_IDENTIFIER" {
            self.ensure_declared(&exp)?;
        }

        node.add_quater(&op, &exp, "", &var);
        node.real_value = var;
        Ok(())
    }

    // lhs op rhs into a fresh temporary; covers relational, additive and
    // multiplicative nodes alike.
    fn handle_binary_operation(&mut self, node: &mut ParseTreeNode) {
        if node.children.len() == 1 {
            return;
        }

        let arg1 = node.children[0].real_value.clone();
        let op = node.children[1].real_value.clone();
        let arg2 = node.children[2].real_value.clone();

        let temp = self.new_temp();
        node.add_quater(&op, &arg1, &arg2, &temp);
        node.real_value = temp;
    }

    // T_LEFT_PAREN expression T_RIGHT_PAREN; single-child factors pass through.
    fn handle_factor(&mut self, node: &mut ParseTreeNode) {
        if node.children.len() > 1 {
            node.real_value = node.children[1].real_value.clone();
        }
    }

    // ++/-- var updates in place; !/~ factor lands in a fresh temporary.
    fn handle_prefix_expression(&mut self, node: &mut ParseTreeNode) {
        let op = node.children[0].real_value.clone();
        let operand = node.children[1].real_value.clone();

        if node.children[0].literal == "inc_dec_operator" {
            let step_op = if op == "++" { "+" } else { "-" };
            node.add_quater(step_op, &operand, "1", &operand);
            node.real_value = operand;
        } else {
            let temp = self.new_temp();
            node.add_quater(&op, &operand, "", &temp);
            node.real_value = temp;
        }
    }

    // var ++/--: the temporary keeps the old value, then the variable steps.
    fn handle_postfix_expression(&mut self, node: &mut ParseTreeNode) {
        let var = node.children[0].real_value.clone();
        let op = node.children[1].real_value.clone();

        let temp = self.new_temp();
        node.add_quater("=", &var, "", &temp);
        let step_op = if op == "++" { "+" } else { "-" };
        node.add_quater(step_op, &var, "1", &var);
        node.real_value = temp;
    }

    // Jump targets are local indices into the node's own quadruple list; the
    // parent's default append shifts every entry uniformly, so the relative
    // layout computed here survives the bottom-up concatenation.
    fn handle_selection_stmt(&mut self, node: &mut ParseTreeNode) {
        let cond = node.children[2].real_value.clone();
        let cond_quaters = node.children[2].quaters.clone();
        node.append_quaters(&cond_quaters);

        if node.children.len() == 5 {
            // T_IF T_LEFT_PAREN expression T_RIGHT_PAREN embedded_stmt
            let then_quaters = node.children[4].quaters.clone();
            let then_start = cond_quaters.len() + 2;
            let endif = then_start + then_quaters.len();

            node.add_jump("jnz", &cond, "", then_start);
            node.add_jump("j", "", "", endif);
            node.append_quaters(&then_quaters);
        } else {
            // ... embedded_stmt T_ELSE embedded_stmt: the else block sits between
            // the two jumps, the then block after them.
            let then_quaters = node.children[4].quaters.clone();
            let else_quaters = node.children[6].quaters.clone();
            let else_start = 1 + cond_quaters.len();
            let then_start = else_start + else_quaters.len() + 1;
            let endif = then_start + then_quaters.len();

            node.add_jump("jnz", &cond, "", then_start);
            node.append_quaters(&else_quaters);
            node.add_jump("j", "", "", endif);
            node.append_quaters(&then_quaters);
        }
    }

    fn handle_iteration_stmt(&mut self, node: &mut ParseTreeNode) {
        if node.children[0].literal == "T_WHILE" {
            // T_WHILE T_LEFT_PAREN expression T_RIGHT_PAREN embedded_stmt
            let cond = node.children[2].real_value.clone();
            let cond_quaters = node.children[2].quaters.clone();
            let body_quaters = node.children[4].quaters.clone();

            let body_start = cond_quaters.len() + 2;
            let loop_end = body_start + body_quaters.len() + 1;

            node.append_quaters(&cond_quaters);
            node.add_jump("jnz", &cond, "", body_start);
            node.add_jump("j", "", "", loop_end);
            node.append_quaters(&body_quaters);
            node.add_jump("j", "", "", 0);
        } else if node.children[0].literal == "T_FOR" {
            // T_FOR T_LEFT_PAREN opt_expression_stmt opt_expression_stmt expression
            // T_RIGHT_PAREN embedded_stmt; the step runs after the body.
            let init_quaters = node.children[2].quaters.clone();
            let cond = node.children[3].real_value.clone();
            let cond_quaters = node.children[3].quaters.clone();
            let step_quaters = node.children[4].quaters.clone();
            let body_quaters = node.children[6].quaters.clone();

            let cond_start = init_quaters.len();
            let body_start = cond_start + cond_quaters.len() + 2;
            let loop_end = body_start + body_quaters.len() + step_quaters.len() + 1;

            node.append_quaters(&init_quaters);
            node.append_quaters(&cond_quaters);
            node.add_jump("jnz", &cond, "", body_start);
            node.add_jump("j", "", "", loop_end);
            node.append_quaters(&body_quaters);
            node.append_quaters(&step_quaters);
            node.add_jump("j", "", "", cond_start);
        }
    }

    // expression T_SEMICOLON or a bare T_SEMICOLON: drop the trailing semicolon so
    // the for-statement can reuse the expression value.
    fn handle_opt_expression_stmt(&mut self, node: &mut ParseTreeNode) {
        if let Some(stripped) = node.real_value.strip_suffix(';') {
            node.real_value = stripped.to_string();
        }
    }
}

fn synthesize_default(node: &mut ParseTreeNode) {
    let mut value = String::new();
    for child in &node.children {
        value.push_str(&child.real_value);
    }
    node.real_value = value;

    // Control-flow nodes lay out their own code blocks and jumps.
    if node.literal != "selection_stmt" && node.literal != "iteration_stmt" {
        for index in 0..node.children.len() {
            let quaters = node.children[index].quaters.clone();
            node.append_quaters(&quaters);
        }
    }
}
