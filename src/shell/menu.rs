use lazy_static::lazy_static;
use std::collections::{HashMap, HashSet};
use super::{
    types::*
};

// Define the macro to add a menu option to the registry
macro_rules! add_option {
    ($reg:ident, $name:expr, title: $title:expr, description: $desc:expr $(,)?) => {{
        $reg.0.insert($name);
        $reg.1.insert($name, MenuEntry { title: $title, description: $desc });
    }};
}

lazy_static! {
    // Create a tuple containing our option names (HashSet) and option descriptions (HashMap).
    static ref OPTIONS: (HashSet<&'static str>, HashMap<&'static str, MenuEntry>) = {
        let mut m = (HashSet::new(), HashMap::new());

        add_option!{
          m, "1",
          title      : "Analyze a directory",
          description: "Prompts for a directory, walks it and reports its usage as a tree view \n\
                        plus a per-extension ranking and the hosting volume's capacity figures. \n\
                        The report can go to the console or to a log file",
        }
        add_option!{
          m, "2",
          title      : "Exit",
          description: "Leaves the program",
        }
        add_option!{
          m, "help",
          title      : "Help",
          description: "Displays all menu option descriptions \n\
                        if an argument is given, it describes just that option",
        }
        m
    };
    pub static ref MENU_OPTIONS: HashSet<&'static str> = OPTIONS.0.clone();
    pub static ref MENU_DESCRIPTIONS: HashMap<&'static str, MenuEntry> = OPTIONS.1.clone();
}
