mod commands;
mod handlers;

pub use commands::{
    Cli, Commands, GoalAction, GoalCommand, ListAction, ListCommand, NoteAction, NoteCommand,
    PlanAction, PlanCommand, TagAction, TagCommand, TargetAction, TargetCommand, TaskAction,
    TaskCommand,
};
pub use handlers::{
    handle_goal, handle_list, handle_note, handle_plan, handle_tag, handle_target, handle_task,
};
