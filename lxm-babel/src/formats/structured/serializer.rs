//! Tree to records

use super::records::{ArgRecord, BlockRecord, CommandRecord, Record};
use crate::common::check_metadata;
use crate::error::FormatError;
use lxm_parser::lxm::{Argument, Block, Command, MacroDocument, Node};

pub fn to_records(doc: &MacroDocument) -> Result<Vec<Record>, FormatError> {
    doc.children.iter().map(to_record).collect()
}

fn to_record(node: &Node) -> Result<Record, FormatError> {
    check_metadata(node.header())?;
    Ok(match node {
        Node::Command(command) => Record::Command(command_record(command)),
        Node::Block(block) => Record::Block(block_record(block)?),
    })
}

fn command_record(command: &Command) -> CommandRecord {
    let header = &command.header;
    CommandRecord {
        name: command.name.clone(),
        prefix: command.prefix.as_str().to_string(),
        suppress: header.suppressed_directly,
        comment: header.comments_before.clone(),
        display_name: header.display_name.clone(),
        meta: header.metadata.clone(),
        args: command.arguments.iter().map(arg_record).collect(),
    }
}

fn block_record(block: &Block) -> Result<BlockRecord, FormatError> {
    let header = &block.header;
    Ok(BlockRecord {
        name: block.name.clone(),
        suppress: header.suppressed_directly,
        comment: header.comments_before.clone(),
        display_name: header.display_name.clone(),
        meta: header.metadata.clone(),
        commands: block
            .children
            .iter()
            .map(to_record)
            .collect::<Result<_, _>>()?,
    })
}

fn arg_record(arg: &Argument) -> ArgRecord {
    let descriptor = arg.descriptor();
    ArgRecord {
        arg_name: arg.name().to_string(),
        value: arg.value.clone(),
        as_string: arg.as_string_override,
        arg_username: descriptor.display_name().to_string(),
        arg_type: descriptor.value_type.as_str().to_string(),
        arg_type_name: descriptor.type_name.clone(),
        arg_desc: descriptor.desc.clone(),
        arg_example: descriptor.example.clone(),
    }
}
