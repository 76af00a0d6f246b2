//! Rendering of the device dump and statistics views. Consumes only
//! `Ftl`'s public accessors; it has no privileged access to FTL internals.

use ssdsim::Ftl;

/// Renders the forward map, block/page headers, and the state/data/live
/// rows, matching the reference tool's column layout.
pub fn dump(ftl: &mut Ftl) {
    print_forward_map(ftl);
    print_block_header(ftl);
    print_page_ruler(ftl);
    print_state_row(ftl);
    print_data_row(ftl);
    print_live_row(ftl);
}

fn print_forward_map(ftl: &Ftl) {
    print!("FTL   ");
    let columns = (ftl.pages_per_block() * ftl.num_blocks() / 7).max(1);
    let mut printed = 0;
    for lpa in 0..ftl.num_logical_pages() {
        if let Some(page) = ftl.forward_map(lpa) {
            print!("{lpa:3}:{page:3} ");
            printed += 1;
            if printed % columns == 0 {
                print!("\n      ");
            }
        }
    }
    if printed == 0 {
        print!("(empty)");
    }
    println!();
}

fn print_block_header(ftl: &Ftl) {
    print!("Block ");
    for block in 0..ftl.num_blocks() {
        print!("{block}");
        for _ in 0..ftl.pages_per_block() {
            print!(" ");
        }
    }
    println!();
}

fn print_page_ruler(ftl: &Ftl) {
    let max_len = ftl.num_pages().saturating_sub(1).to_string().len().max(1);
    for digit in (0..max_len).rev() {
        if digit == max_len - 1 {
            print!("Page  ");
        } else {
            print!("      ");
        }
        for page in 0..ftl.num_pages() {
            let rendered = format!("{page:0width$}", width = max_len);
            print!("{}", rendered.as_bytes()[max_len - 1 - digit] as char);
            if (page + 1) % 10 == 0 {
                print!(" ");
            }
        }
        println!();
    }
}

fn print_state_row(ftl: &Ftl) {
    print!("State ");
    for page in 0..ftl.num_pages() {
        print!("{}", ftl.page_state(page).printable());
        if (page + 1) % 10 == 0 {
            print!(" ");
        }
    }
    println!();
}

fn print_data_row(ftl: &mut Ftl) {
    print!("Data  ");
    for page in 0..ftl.num_pages() {
        match ftl.page_data(page) {
            Some(byte) => print!("{}", byte as char),
            None => print!(" "),
        }
        if (page + 1) % 10 == 0 {
            print!(" ");
        }
    }
    println!();
}

fn print_live_row(ftl: &Ftl) {
    print!("Live  ");
    for page in 0..ftl.num_pages() {
        print!("{}", if ftl.is_live(page) { '+' } else { ' ' });
        if (page + 1) % 10 == 0 {
            print!(" ");
        }
    }
    println!();
}

/// Renders per-block operation counters and derived timing totals.
pub fn stats(ftl: &Ftl) {
    println!("Physical Operations Per Block");

    print!("Erases ");
    for block in 0..ftl.num_blocks() {
        print!("{:3}        ", ftl.block_counters(block).erases);
    }
    println!("  Sum: {}", ftl.erase_sum());

    print!("Writes ");
    for block in 0..ftl.num_blocks() {
        print!("{:3}        ", ftl.block_counters(block).writes);
    }
    println!("  Sum: {}", ftl.write_sum());

    print!("Reads  ");
    for block in 0..ftl.num_blocks() {
        print!("{:3}        ", ftl.block_counters(block).reads);
    }
    println!("  Sum: {}", ftl.read_sum());

    println!();
    println!("Logical Operation Sums");
    let counters = ftl.logical_counters();
    println!(
        "  Write count {} ({} failed)",
        counters.writes, counters.write_failures
    );
    println!(
        "  Read count  {} ({} failed)",
        counters.reads, counters.read_failures
    );
    println!(
        "  Trim count  {} ({} failed)",
        counters.trims, counters.trim_failures
    );

    println!();
    println!("Times");
    let (erase_time, write_time, read_time, total_time) = ftl.times();
    println!("  Erase time {erase_time:.2}");
    println!("  Write time {write_time:.2}");
    println!("  Read time  {read_time:.2}");
    println!("  Total time {total_time:.2}");
}
