use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "horizons")]
#[command(version, about = "A local-first planner for tasks, goals, and plans")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage tasks
    Task(TaskCommand),
    /// Manage custom task lists
    List(ListCommand),
    /// Manage three-year goals
    Goal(GoalCommand),
    /// Manage ninety-day targets
    Target(TargetCommand),
    /// Manage plans
    Plan(PlanCommand),
    /// Manage tags
    Tag(TagCommand),
    /// Show or replace the notepad
    Note(NoteCommand),
}

#[derive(Args, Debug)]
pub struct TaskCommand {
    #[command(subcommand)]
    pub action: TaskAction,
}

#[derive(Subcommand, Debug)]
pub enum TaskAction {
    /// Add a new task
    Add {
        /// Task title
        title: String,

        /// List to file the task under (defaults to the inbox)
        #[arg(long)]
        list: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,

        /// Tag ids (can be specified multiple times)
        #[arg(long = "tag", short = 't')]
        tags: Vec<String>,

        /// Read notes from stdin
        #[arg(long)]
        stdin: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List tasks
    List {
        /// Include completed tasks
        #[arg(long)]
        all: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Toggle completion for a task
    Done {
        /// Task id or unique id prefix
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update a task
    Update {
        /// Task id or unique id prefix
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// Move to another list
        #[arg(long)]
        list: Option<String>,

        /// New due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,

        /// Clear the due date
        #[arg(long, conflicts_with = "due")]
        clear_due: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a task
    Rm {
        /// Task id or unique id prefix
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[derive(Args, Debug)]
pub struct ListCommand {
    #[command(subcommand)]
    pub action: ListAction,
}

#[derive(Subcommand, Debug)]
pub enum ListAction {
    /// Add a new list
    Add {
        /// List name
        name: String,

        /// Display color (hex or named)
        #[arg(long)]
        color: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show all lists
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update a list
    Update {
        /// List id or unique id prefix
        id: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New display color
        #[arg(long)]
        color: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a list; its tasks move back to the inbox
    Rm {
        /// List id or unique id prefix
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[derive(Args, Debug)]
pub struct GoalCommand {
    #[command(subcommand)]
    pub action: GoalAction,
}

#[derive(Subcommand, Debug)]
pub enum GoalAction {
    /// Add a three-year goal
    Add {
        /// Goal title
        title: String,

        /// Longer description
        #[arg(long)]
        description: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show all goals
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update a goal
    Update {
        /// Goal id or unique id prefix
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New status (active, achieved, abandoned)
        #[arg(long)]
        status: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a goal and everything under it
    Rm {
        /// Goal id or unique id prefix
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[derive(Args, Debug)]
pub struct TargetCommand {
    #[command(subcommand)]
    pub action: TargetAction,
}

#[derive(Subcommand, Debug)]
pub enum TargetAction {
    /// Add a ninety-day target under a goal
    Add {
        /// Target title
        title: String,

        /// Parent goal id or unique id prefix
        #[arg(long)]
        goal: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show all targets
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update a target
    Update {
        /// Target id or unique id prefix
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New status (active, achieved, abandoned)
        #[arg(long)]
        status: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a target and its plans
    Rm {
        /// Target id or unique id prefix
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[derive(Args, Debug)]
pub struct PlanCommand {
    #[command(subcommand)]
    pub action: PlanAction,
}

#[derive(Subcommand, Debug)]
pub enum PlanAction {
    /// Add a plan under a target
    Add {
        /// Plan title
        title: String,

        /// Parent target id or unique id prefix
        #[arg(long)]
        target: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show all plans
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update a plan
    Update {
        /// Plan id or unique id prefix
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New status (active, achieved, abandoned)
        #[arg(long)]
        status: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a plan
    Rm {
        /// Plan id or unique id prefix
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[derive(Args, Debug)]
pub struct TagCommand {
    #[command(subcommand)]
    pub action: TagAction,
}

#[derive(Subcommand, Debug)]
pub enum TagAction {
    /// Add a tag
    Add {
        /// Tag name
        name: String,

        /// Display color (hex or named)
        #[arg(long)]
        color: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show all tags
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a tag
    Rm {
        /// Tag id or unique id prefix
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[derive(Args, Debug)]
pub struct NoteCommand {
    #[command(subcommand)]
    pub action: NoteAction,
}

#[derive(Subcommand, Debug)]
pub enum NoteAction {
    /// Print the notepad
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace the notepad text
    Set {
        /// New text; omit to read from stdin
        text: Option<String>,

        /// Read the text from stdin
        #[arg(long)]
        stdin: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
