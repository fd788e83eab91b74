fn main() -> anyhow::Result<()> {
    lexmap_lib::run()
}
